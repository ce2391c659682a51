use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::upload::UploadMetadata;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub asset_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInsert {
    pub title: String,
    pub description: Option<String>,
    pub asset_id: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub duration: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, MultipartForm)]
pub struct VideoUploadForm {
    #[multipart(limit = "100MiB")]
    pub file: Option<TempFile>,

    pub title: Option<Text<String>>,

    pub description: Option<Text<String>>,

    #[multipart(rename = "originalSize")]
    pub original_size: Option<Text<String>>,
}

/// Descriptive fields checked before any bytes leave the service.
#[derive(Debug, Deserialize, Validate)]
pub struct VideoDetails {
    #[validate(length(min = 1, max = 200, message = "Title is required and must be at most 200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl VideoDetails {
    pub fn from_metadata(metadata: &UploadMetadata) -> Self {
        VideoDetails {
            title: metadata.title.as_deref().unwrap_or_default().trim().to_string(),
            description: metadata
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        }
    }
}

impl VideoInsert {
    pub fn new(
        details: VideoDetails,
        asset_id: String,
        original_size: i64,
        compressed_size: i64,
        duration: f64,
    ) -> Self {
        let now = Utc::now();
        VideoInsert {
            title: details.title,
            description: details.description,
            asset_id,
            original_size,
            compressed_size,
            duration,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Parses the client-declared size. Anything that is not a non-negative
/// integer is treated as absent.
pub fn parse_declared_size(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|size| *size >= 0)
}

// ───── API Models ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUploadResponse {
    pub message: String,
    pub asset_id: String,
    pub original_url: String,
    pub compressed_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideoUrlQuery {
    #[serde(rename = "assetId", alias = "publicId")]
    pub asset_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUrlResponse {
    pub asset_id: String,
    pub url: String,
}
