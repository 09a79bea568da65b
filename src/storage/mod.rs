use std::future::Future;
use thiserror::Error;

use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e.to_string())
    }
}

/// Where portfolio image bytes live. Only the returned URL is persisted.
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `path` (relative to the bucket).
    fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove objects. Missing objects are not an error.
    fn remove(&self, paths: &[String]) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Public URL of an object.
    fn public_url(&self, path: &str) -> String;
}

/// Supabase Storage over its REST API.
#[derive(Clone)]
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    key: String,
}

impl SupabaseStorage {
    pub fn new(supabase_url: &str, bucket: &str, key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("{}/storage/v1", supabase_url.trim_end_matches('/')),
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, self.bucket, path)
    }

    async fn check(response: reqwest::Response) -> Result<(), StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        tracing::debug!(path, size = bytes.len(), "Uploading object");

        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.key)
            .header("apikey", &self.key)
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        Self::check(response).await
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .delete(format!("{}/object/{}", self.base_url, self.bucket))
            .bearer_auth(&self.key)
            .header("apikey", &self.key)
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .await?;

        Self::check(response).await
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, path)
    }
}

/// Object path for a portfolio image: `<vendor>/<portfolio>/<uuid>-<sanitized name>`.
pub fn portfolio_image_path(vendor_id: uuid::Uuid, portfolio_id: uuid::Uuid, file_name: &str) -> String {
    let sanitized: String = file_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let sanitized = sanitized.trim_matches('-');
    let name = if sanitized.is_empty() { "image" } else { sanitized };

    format!("{vendor_id}/{portfolio_id}/{}-{name}", uuid::Uuid::new_v4())
}
