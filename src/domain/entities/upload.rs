use std::fmt;

use serde::Serialize;

use crate::entities::rendition::OutputFormat;

/// Classification of an upload, selecting validation and transformation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
        }
    }

    /// Container used when deriving a delivery URL for this kind.
    pub fn delivery_format(&self) -> OutputFormat {
        match self {
            ResourceKind::Image => OutputFormat::Png,
            ResourceKind::Video => OutputFormat::Mp4,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ───── Pipeline Input ───────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct UploadMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Size reported by the client. Record-keeping only.
    pub original_size: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub payload: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub metadata: UploadMetadata,
}

impl UploadRequest {
    pub fn new(payload: Vec<u8>, content_type: Option<String>) -> Self {
        UploadRequest {
            payload,
            content_type,
            file_name: None,
            metadata: UploadMetadata::default(),
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    pub fn with_metadata(mut self, metadata: UploadMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

// ───── Store Exchange ───────────────────────────────────────────────

/// One upload call against the remote asset store.
#[derive(Debug, Clone)]
pub struct StoreUpload {
    pub kind: ResourceKind,
    pub payload: Vec<u8>,
    pub file_name: Option<String>,
    pub folder: String,
    pub tags: Vec<String>,
    /// Transformation descriptors, in preset order.
    pub eager: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredRendition {
    pub url: String,
    pub transformation: Option<String>,
    pub bytes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub asset_id: String,
    pub url: String,
    pub bytes: i64,
    pub duration: Option<f64>,
    pub renditions: Vec<StoredRendition>,
}

// ───── Pipeline Output ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenditionUrl {
    pub preset: String,
    pub url: String,
    #[serde(skip)]
    pub bytes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub asset_id: String,
    pub url: String,
    /// Generated renditions, in request order.
    pub renditions: Vec<RenditionUrl>,
    pub bytes: i64,
    pub duration: Option<f64>,
}

impl UploadResult {
    pub fn rendition(&self, preset: &str) -> Option<&RenditionUrl> {
        self.renditions.iter().find(|r| r.preset == preset)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub asset_id: String,
    pub url: String,
    pub renditions: Vec<RenditionUrl>,
}

impl From<UploadResult> for ImageUploadResponse {
    fn from(result: UploadResult) -> Self {
        ImageUploadResponse {
            asset_id: result.asset_id,
            url: result.url,
            renditions: result.renditions,
        }
    }
}
