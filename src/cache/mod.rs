use redis::{AsyncCommands, Client, ErrorKind, RedisError, RedisResult, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;

#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: CacheConfig,
}

impl RedisCache {
    pub async fn new(redis_url: &str, config: CacheConfig) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection, config })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Values are stored as JSON strings; an entry that no longer decodes is a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> RedisResult<Option<T>> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn.get(key).await?;

        Ok(raw.and_then(|json| match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }))
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> RedisResult<()> {
        let json = serde_json::to_string(value).map_err(|e| {
            RedisError::from((ErrorKind::TypeError, "Serialization error", e.to_string()))
        })?;

        redis::cmd("SET")
            .arg(key)
            .arg(json)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut self.connection.clone())
            .await
    }

    /// Delete every key matching `pattern`, walking the keyspace with SCAN.
    pub async fn delete_pattern(&self, pattern: &str) -> RedisResult<()> {
        let mut conn = self.connection.clone();
        let mut cursor: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let _: () = conn.del(&keys).await?;
            }
            if next == 0 {
                return Ok(());
            }
            cursor = next;
        }
    }
}

/// Cache key generators
pub mod keys {
    pub const VENDOR_LISTS: &str = "vendors:list:*";

    pub fn categories() -> String {
        "categories:all".to_string()
    }

    /// Key for one discovery result set.
    pub fn vendor_list(filters: &str) -> String {
        format!("vendors:list:{filters}")
    }
}

/// Wrapper type for Actix-web app data
pub type CacheData = Arc<RedisCache>;

/// Read-through helper: serve `key` from the cache when possible, otherwise run
/// `load` and store its result. Cache failures are logged and never fail the request.
pub async fn cached<T, E, F, Fut>(
    cache: Option<&RedisCache>,
    key: &str,
    ttl: fn(&CacheConfig) -> Duration,
    load: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let Some(cache) = cache else {
        return load().await;
    };

    match cache.get::<T>(key).await {
        Ok(Some(hit)) => return Ok(hit),
        Ok(None) => {}
        Err(e) => tracing::warn!(key, error = %e, "Cache read failed"),
    }

    let value = load().await?;
    if let Err(e) = cache.set(key, &value, ttl(cache.config())).await {
        tracing::warn!(key, error = %e, "Cache write failed");
    }
    Ok(value)
}

/// Drop every cached vendor listing after a vendor-visible change.
pub async fn invalidate_vendor_lists(cache: Option<&RedisCache>) {
    if let Some(cache) = cache {
        if let Err(e) = cache.delete_pattern(keys::VENDOR_LISTS).await {
            tracing::warn!(error = %e, "Cache invalidation failed");
        }
    }
}
