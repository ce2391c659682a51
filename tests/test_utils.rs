#![allow(dead_code)]

use actix_web::{web, App, HttpServer};
use async_trait::async_trait;
use media_ingest::{
    entities::{
        upload::{ResourceKind, StoreUpload, StoredAsset, StoredRendition},
        video::{VideoInsert, VideoRecord},
    },
    errors::{AppError, StoreError},
    repositories::{asset_store::AssetStore, video::VideoRepository},
    routes::configure_routes,
    use_cases::ingest::IngestPolicy,
    AppState, SharedAssetStore, SharedVideoRepo,
};
use reqwest::Client;
use std::{
    net::TcpListener,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use uuid::Uuid;

// ───── Fake Asset Store ─────────────────────────────────────────────

/// Store double that hands out a fresh id per call and echoes back the
/// requested transformations in order.
pub struct FakeStore {
    calls: AtomicUsize,
    rendition_limit: Option<usize>,
    failure: Option<String>,
}

impl FakeStore {
    pub fn new() -> Self {
        FakeStore {
            calls: AtomicUsize::new(0),
            rendition_limit: None,
            failure: None,
        }
    }

    /// Only the first `limit` requested renditions are produced.
    pub fn with_rendition_limit(mut self, limit: usize) -> Self {
        self.rendition_limit = Some(limit);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetStore for FakeStore {
    async fn upload(&self, upload: StoreUpload) -> Result<StoredAsset, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(StoreError::Rejected { status: 400, message: message.clone() });
        }

        let asset_id = format!("{}/{}", upload.folder, Uuid::new_v4());
        let bytes = upload.payload.len() as i64;
        let limit = self.rendition_limit.unwrap_or(upload.eager.len());

        let renditions = upload
            .eager
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, tag)| StoredRendition {
                url: format!("https://cdn.test/{}/eager/{}", asset_id, i),
                transformation: Some(tag.clone()),
                bytes: Some(bytes / 2),
            })
            .collect();

        Ok(StoredAsset {
            url: self.delivery_url(upload.kind, &asset_id),
            asset_id,
            bytes,
            duration: match upload.kind {
                ResourceKind::Video => Some(3.5),
                ResourceKind::Image => None,
            },
            renditions,
        })
    }

    fn delivery_url(&self, kind: ResourceKind, asset_id: &str) -> String {
        format!("https://cdn.test/{}/upload/{}.{}", kind, asset_id, kind.delivery_format())
    }
}

// ───── In-memory Video Repository ───────────────────────────────────

pub struct InMemoryVideoRepo {
    videos: Mutex<Vec<VideoRecord>>,
    fail_inserts: AtomicBool,
}

impl InMemoryVideoRepo {
    pub fn new() -> Self {
        InMemoryVideoRepo {
            videos: Mutex::new(Vec::new()),
            fail_inserts: AtomicBool::new(false),
        }
    }

    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.videos.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_video(&self, video: &VideoInsert) -> Result<VideoRecord, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::InternalError("Database error: connection refused".into()));
        }

        let record = VideoRecord {
            id: Uuid::new_v4(),
            title: video.title.clone(),
            description: video.description.clone(),
            asset_id: video.asset_id.clone(),
            original_size: video.original_size,
            compressed_size: video.compressed_size,
            duration: video.duration,
            created_at: video.created_at,
            updated_at: video.updated_at,
        };
        self.videos.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_videos(&self) -> Result<Vec<VideoRecord>, AppError> {
        let mut videos = self.videos.lock().unwrap().clone();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }
}

// ───── Test Server ──────────────────────────────────────────────────

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub store: Arc<FakeStore>,
    pub video_repo: Arc<InMemoryVideoRepo>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(FakeStore::new(), IngestPolicy::default()).await
    }

    pub async fn spawn_with(store: FakeStore, policy: IngestPolicy) -> Self {
        let store = Arc::new(store);
        let video_repo = Arc::new(InMemoryVideoRepo::new());

        let state = web::Data::new(AppState::from_parts(
            store.clone() as SharedAssetStore,
            video_repo.clone() as SharedVideoRepo,
            policy,
        ));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .disable_signals()
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(&format!("{}/", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            address,
            client,
            store,
            video_repo,
        }
    }

    pub async fn post_form(&self, path: &str, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", self.address, path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send upload")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to send request")
    }
}
