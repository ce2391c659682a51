use actix_multipart::{form::MultipartFormConfig, MultipartError};
use actix_web::{
    web,
    http::StatusCode,
    ResponseError,
    HttpResponse,
    error::QueryPayloadError,
};
use serde_json::json;

use crate::constants::MAX_MULTIPART_BYTES;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(MAX_MULTIPART_BYTES)
            .error_handler(|err, _req| ExtractorError::from(err).into())
    );
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ExtractorError::from(err).into()
    }));
}

/// Rejections raised before a handler runs, rendered in the same JSON shape
/// as every other error.
#[derive(Debug)]
pub struct ExtractorError {
    error: &'static str,
    message: String,
    status: StatusCode
}

impl std::fmt::Display for ExtractorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ExtractorError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(json!({
            "error": self.error,
            "message": self.message
        }))
    }
}

impl From<MultipartError> for ExtractorError {
    fn from(err: MultipartError) -> Self {
        tracing::debug!("Rejected multipart body: {}", err);
        match err {
            MultipartError::ContentTypeIncompatible | MultipartError::ContentTypeMissing => ExtractorError {
                error: "invalid_content_type",
                message: "Request must be multipart/form-data".to_string(),
                status: StatusCode::BAD_REQUEST,
            },
            MultipartError::Payload(_) => ExtractorError {
                error: "payload_too_large",
                message: "File too large".to_string(),
                status: StatusCode::PAYLOAD_TOO_LARGE,
            },
            _ => ExtractorError {
                error: "validation_error",
                message: format!("Invalid multipart form: {}", err),
                status: StatusCode::BAD_REQUEST,
            },
        }
    }
}

impl From<QueryPayloadError> for ExtractorError {
    fn from(err: QueryPayloadError) -> Self {
        ExtractorError {
            error: "validation_error",
            message: format!("Invalid query string: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}
