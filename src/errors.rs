use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

/// Every failure a handler or workflow operation can report.
///
/// Renders as `{"error": "<message>"}` with the matching status code. Provider
/// failures (database, storage) are logged and replaced with a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[source] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<DbErr> for AppError {
    /// A unique-index violation means a concurrent request wrote the same row first.
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::warn!(detail = %detail, "Unique constraint violated");
                AppError::Conflict(
                    "This was just changed by another request. Please reload and try again."
                        .to_string(),
                )
            }
            _ => AppError::Database(e),
        }
    }
}

impl AppError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(DbErr::RecordNotFound(what)) => what.clone(),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Something went wrong. Please try again.".to_string()
            }
            AppError::Storage(e) => {
                tracing::error!(error = %e, "Storage error");
                "Failed to reach file storage. Please try again.".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_hide_details() {
        let err = AppError::Database(DbErr::Custom("connection refused on 10.0.0.3".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::Storage("bucket missing".into());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn not_found_names_the_entity() {
        let id = Uuid::nil();
        let err = AppError::not_found("Project", id);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), format!("Project {id} not found"));
    }

    #[test]
    fn record_not_found_maps_to_404() {
        let err = AppError::Database(DbErr::RecordNotFound("Quote not found".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
