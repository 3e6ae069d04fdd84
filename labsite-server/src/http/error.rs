//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Every body carries `error` (machine-readable kind) and `message`;
//! validation failures add the offending `field`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;
use crate::storage::StorageError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Required field missing or malformed (400)
    Validation(ValidationError),

    /// Body couldn't be read as a form (400, 413 when too large)
    BadForm { status: StatusCode, message: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Upload couldn't be written (500, logged)
    Storage(StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
            Self::BadForm { status, message } => (*status, "bad_request", message.clone()),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                let (kind, message) = match e {
                    DbError::Connection(_) => ("database_unavailable", "database is unavailable"),
                    DbError::Constraint(_) => {
                        ("constraint_violation", "database rejected the record")
                    }
                    DbError::Statement(_) => ("internal_error", "database operation failed"),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, kind, message.to_string())
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "failed to store uploaded image".to_string(),
                )
            }
        };

        let mut body = json!({ "error": kind, "message": message });
        if let Self::Validation(e) = &self {
            body["field"] = json!(e.field());
        }

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
