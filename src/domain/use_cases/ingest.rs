use std::time::Duration;

use tokio::time::timeout;
use validator::Validate;

use crate::{
    entities::{
        rendition::{social_presets, video_preset, RenditionSpec},
        upload::{RenditionUrl, ResourceKind, StoreUpload, StoredRendition, UploadRequest, UploadResult},
        video::{VideoDetails, VideoInsert},
    },
    errors::{AppError, StoreError},
    repositories::{asset_store::AssetStore, video::VideoRepository},
    settings::MediaConfig,
    utils::content_type::{is_allowed, resolve_content_type},
};

/// Limits and upload options applied to every ingest.
#[derive(Debug, Clone)]
pub struct IngestPolicy {
    pub enforce_image_types: bool,
    pub allowed_image_types: Vec<String>,
    pub max_video_bytes: u64,
    pub image_folder: String,
    pub video_folder: String,
    pub image_tags: Vec<String>,
    pub upstream_timeout: Duration,
}

impl From<&MediaConfig> for IngestPolicy {
    fn from(config: &MediaConfig) -> Self {
        IngestPolicy {
            enforce_image_types: config.enforce_image_types,
            allowed_image_types: config.allowed_image_types(),
            max_video_bytes: config.max_video_bytes,
            image_folder: config.image_folder.clone(),
            video_folder: config.video_folder.clone(),
            image_tags: config.image_tags(),
            upstream_timeout: Duration::from_secs(config.upstream_timeout_secs),
        }
    }
}

impl Default for IngestPolicy {
    fn default() -> Self {
        IngestPolicy::from(&MediaConfig::default())
    }
}

pub struct IngestHandler<S, R>
where
    S: AssetStore,
    R: VideoRepository,
{
    pub store: S,
    pub video_repo: R,
    pub policy: IngestPolicy,
}

impl<S, R> IngestHandler<S, R>
where
    S: AssetStore,
    R: VideoRepository,
{
    pub fn new(store: S, video_repo: R, policy: IngestPolicy) -> Self {
        IngestHandler {
            store,
            video_repo,
            policy,
        }
    }

    /// Uploads an image and requests every social preset.
    pub async fn upload_image(&self, request: UploadRequest) -> Result<UploadResult, AppError> {
        self.ingest(request, social_presets(), ResourceKind::Image).await
    }

    /// Uploads a video with its compressed rendition and records it.
    pub async fn upload_video(&self, request: UploadRequest) -> Result<UploadResult, AppError> {
        self.ingest(request, std::slice::from_ref(video_preset()), ResourceKind::Video).await
    }

    /// Validates the request, sends it to the store with the requested
    /// renditions and, for videos, persists a record of the result.
    ///
    /// Nothing is transferred when validation fails. A store failure is
    /// surfaced as `UpstreamError` without retrying. A failed record save
    /// after a successful upload is a `PersistenceError` naming the asset.
    pub async fn ingest(
        &self,
        request: UploadRequest,
        renditions: &[RenditionSpec],
        kind: ResourceKind,
    ) -> Result<UploadResult, AppError> {
        let details = self.validate(&request, kind)?;

        let payload_len = request.payload.len() as i64;
        let declared_size = request.metadata.original_size;

        let (folder, tags) = match kind {
            ResourceKind::Image => (self.policy.image_folder.clone(), self.policy.image_tags.clone()),
            ResourceKind::Video => (self.policy.video_folder.clone(), Vec::new()),
        };

        let upload = StoreUpload {
            kind,
            payload: request.payload,
            file_name: request.file_name,
            folder,
            tags,
            eager: renditions.iter().map(RenditionSpec::transformation).collect(),
        };

        tracing::info!(%kind, bytes = payload_len, renditions = renditions.len(), "Uploading to media store");

        let stored = match timeout(self.policy.upstream_timeout, self.store.upload(upload)).await {
            Ok(Ok(stored)) => stored,
            Ok(Err(e)) => {
                tracing::error!(%kind, "Media store upload failed: {}", e);
                return Err(e.into());
            }
            Err(_) => {
                let e = StoreError::Timeout(self.policy.upstream_timeout.as_secs());
                tracing::error!(%kind, "Media store upload failed: {}", e);
                return Err(e.into());
            }
        };

        if stored.asset_id.trim().is_empty() || stored.url.trim().is_empty() {
            tracing::error!(%kind, "Media store returned an asset without id or URL");
            return Err(StoreError::InvalidResponse("missing asset id or URL".into()).into());
        }

        let result = UploadResult {
            renditions: pair_renditions(renditions, stored.renditions),
            asset_id: stored.asset_id,
            url: stored.url,
            bytes: stored.bytes,
            duration: stored.duration,
        };

        tracing::info!(
            asset_id = %result.asset_id,
            %kind,
            renditions = result.renditions.len(),
            "Upload complete"
        );

        if let Some(details) = details {
            let compressed_size = result
                .renditions
                .first()
                .and_then(|r| r.bytes)
                .unwrap_or(result.bytes);

            let insert = VideoInsert::new(
                details,
                result.asset_id.clone(),
                declared_size.unwrap_or(payload_len),
                compressed_size,
                result.duration.unwrap_or(0.0),
            );

            if let Err(e) = self.video_repo.create_video(&insert).await {
                tracing::error!(asset_id = %result.asset_id, "Failed to save video record: {}", e);
                return Err(AppError::PersistenceError {
                    asset_id: result.asset_id,
                    message: e.to_string(),
                });
            }
        }

        Ok(result)
    }

    /// Checks everything that can be checked before a transfer. Returns the
    /// record details for videos.
    fn validate(&self, request: &UploadRequest, kind: ResourceKind) -> Result<Option<VideoDetails>, AppError> {
        if request.payload.is_empty() {
            return Err(AppError::validation("file", "No file uploaded"));
        }

        match kind {
            ResourceKind::Image => {
                if self.policy.enforce_image_types {
                    let content_type = resolve_content_type(request.content_type.as_deref(), &request.payload)
                        .unwrap_or_else(|| "unknown".to_string());

                    if !is_allowed(&content_type, &self.policy.allowed_image_types) {
                        return Err(AppError::validation(
                            "file",
                            format!(
                                "Unsupported file type {}. Allowed: {}",
                                content_type,
                                self.policy.allowed_image_types.join(", ")
                            ),
                        ));
                    }
                }
                Ok(None)
            }
            ResourceKind::Video => {
                // Measured on the buffered bytes; the declared size is never consulted
                if request.payload.len() as u64 > self.policy.max_video_bytes {
                    return Err(AppError::validation(
                        "file",
                        format!(
                            "File size too large. Maximum allowed is {} MB.",
                            self.policy.max_video_bytes / (1024 * 1024)
                        ),
                    ));
                }

                let details = VideoDetails::from_metadata(&request.metadata);
                details.validate()?;
                Ok(Some(details))
            }
        }
    }
}

/// Pairs generated renditions with the presets that requested them, by
/// position.
///
/// The store answers in request order and may drop presets it failed to
/// produce, so only the first `generated.len()` presets get an entry.
/// Surplus renditions are ignored.
pub fn pair_renditions(requested: &[RenditionSpec], generated: Vec<StoredRendition>) -> Vec<RenditionUrl> {
    if generated.len() != requested.len() {
        tracing::warn!(
            requested = requested.len(),
            generated = generated.len(),
            "Media store returned a different number of renditions than requested"
        );
    }

    requested
        .iter()
        .zip(generated)
        .map(|(spec, rendition)| {
            if let Some(echo) = rendition.transformation.as_deref() {
                if echo != spec.transformation() {
                    tracing::warn!(
                        preset = spec.name,
                        expected = %spec.transformation(),
                        returned = echo,
                        "Rendition tag does not match its position"
                    );
                }
            }

            RenditionUrl {
                preset: spec.name.to_string(),
                url: rendition.url,
                bytes: rendition.bytes,
            }
        })
        .collect()
}
