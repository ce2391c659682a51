use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod telemetry;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, media, utils};

use errors::StoreError;
use media::cloudinary::CloudinaryStore;
use repositories::{asset_store::AssetStore, sqlx_repo::SqlxVideoRepo, video::VideoRepository};
use use_cases::{ingest::{IngestHandler, IngestPolicy}, videos::VideoHandler};

pub type SharedAssetStore = Arc<dyn AssetStore>;
pub type SharedVideoRepo = Arc<dyn VideoRepository>;

pub type AppIngestHandler = IngestHandler<SharedAssetStore, SharedVideoRepo>;
pub type AppVideoHandler = VideoHandler<SharedAssetStore, SharedVideoRepo>;

pub struct AppState {
    pub ingest_handler: AppIngestHandler,
    pub video_handler: AppVideoHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Result<Self, StoreError> {
        let store: SharedAssetStore = Arc::new(CloudinaryStore::new(&config.media)?);
        let video_repo: SharedVideoRepo = Arc::new(SqlxVideoRepo::new(&config.database_url));

        Ok(AppState::from_parts(store, video_repo, IngestPolicy::from(&config.media)))
    }

    /// Wires handlers around an arbitrary store and repository.
    pub fn from_parts(store: SharedAssetStore, video_repo: SharedVideoRepo, policy: IngestPolicy) -> Self {
        AppState {
            ingest_handler: IngestHandler::new(store.clone(), video_repo.clone(), policy),
            video_handler: VideoHandler::new(store, video_repo),
        }
    }
}
