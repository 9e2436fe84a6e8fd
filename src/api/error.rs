use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file provided")]
    NoFileProvided,

    #[error("Unable to scan files!")]
    DirectoryUnreadable,

    #[error("Could not delete the file: {name}. {reason}")]
    DeleteFailed { name: String, reason: String },

    #[error("Could not create the archive: {0}")]
    ArchiveCreationFailed(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(name) => AppError::NotFound(format!("File not found: {}", name)),
            StorageError::InvalidKey(name) => {
                AppError::BadRequest(format!("Invalid file name: {}", name))
            }
            StorageError::Unreadable(_) => AppError::DirectoryUnreadable,
            StorageError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NoFileProvided => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::DirectoryUnreadable => {
                tracing::error!("Storage directory could not be scanned");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::DeleteFailed { .. } | AppError::ArchiveCreationFailed(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
