use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const MIB: u64 = 1024 * 1024;

pub const DEFAULT_MAX_VIDEO_BYTES: u64 = 70 * MIB;

/// Per-file ceiling applied by the video form extractor. Keep in step with
/// the `limit` attribute on `VideoUploadForm::file`.
pub const MAX_VIDEO_FIELD_BYTES: u64 = 100 * MIB;

pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 120;

/// Upper bound on a whole multipart body; per-kind limits are enforced by the pipeline.
pub const MAX_MULTIPART_BYTES: usize = 110 * 1024 * 1024;
