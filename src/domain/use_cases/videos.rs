use crate::{
    entities::{
        upload::ResourceKind,
        video::{VideoRecord, VideoUrlResponse},
    },
    errors::AppError,
    repositories::{asset_store::AssetStore, video::VideoRepository},
};

pub struct VideoHandler<S, R>
where
    S: AssetStore,
    R: VideoRepository,
{
    pub store: S,
    pub video_repo: R,
}

impl<S, R> VideoHandler<S, R>
where
    S: AssetStore,
    R: VideoRepository,
{
    pub fn new(store: S, video_repo: R) -> Self {
        VideoHandler { store, video_repo }
    }

    /// Lists persisted videos, newest first
    pub async fn list_videos(&self) -> Result<Vec<VideoRecord>, AppError> {
        self.video_repo.list_videos().await
    }

    /// Derives the delivery URL of a video without asking the store
    pub fn video_url(&self, asset_id: Option<&str>) -> Result<VideoUrlResponse, AppError> {
        let asset_id = asset_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::validation("assetId", "Asset ID required"))?;

        Ok(VideoUrlResponse {
            asset_id: asset_id.to_string(),
            url: self.store.delivery_url(ResourceKind::Video, asset_id),
        })
    }
}
