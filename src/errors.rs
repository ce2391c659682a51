use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    /// The client sent something unusable. Nothing was transferred.
    ValidationError(Vec<FieldError>),
    /// The remote asset store rejected the upload, was unreachable or timed out.
    UpstreamError(String),
    /// The asset exists upstream but its record could not be saved.
    PersistenceError { asset_id: String, message: String },
    NotFound(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            AppError::PersistenceError { asset_id, message } => {
                write!(f, "Persistence error for asset {}: {}", asset_id, message)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    /// Asset left behind upstream when a later step failed.
    pub fn orphaned_asset_id(&self) -> Option<&str> {
        match self {
            AppError::PersistenceError { asset_id, .. } => Some(asset_id),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "error": "validation_error",
                    "message": "Validation failed",
                    "details": errors
                })
            }
            AppError::UpstreamError(_) => {
                serde_json::json!({
                    "error": "upstream_error",
                    "message": "Upload to the media store failed. Please try again."
                })
            }
            AppError::PersistenceError { asset_id, .. } => {
                serde_json::json!({
                    "error": "persistence_error",
                    "message": "Upload succeeded but the record could not be saved.",
                    "assetId": asset_id
                })
            }
            AppError::NotFound(msg) => {
                serde_json::json!({"error": "not_found", "message": msg})
            }
            AppError::InternalError(_) => {
                serde_json::json!({
                    "error": "internal_server_error",
                    "message": "Internal server error"
                })
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::PersistenceError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("IO error: {}", err))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::UpstreamError(err.to_string())
    }
}

/// Failures talking to the remote asset store.
#[derive(Debug, Display)]
pub enum StoreError {
    #[display("Store rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[display("Store unreachable: {_0}")]
    Transport(String),

    #[display("Unexpected store response: {_0}")]
    InvalidResponse(String),

    #[display("Store did not respond within {_0}s")]
    Timeout(u64),
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::InvalidResponse(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
