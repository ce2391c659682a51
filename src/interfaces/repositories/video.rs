use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    db::postgres::get_connection,
    entities::video::{VideoInsert, VideoRecord},
    errors::AppError,
    repositories::sqlx_repo::SqlxVideoRepo,
};

#[automock]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;

    /// Inserts a record and returns it as stored
    async fn create_video(&self, video: &VideoInsert) -> Result<VideoRecord, AppError>;

    /// Lists every record, newest first
    async fn list_videos(&self) -> Result<Vec<VideoRecord>, AppError>;
}

#[async_trait]
impl<T> VideoRepository for Arc<T>
where
    T: VideoRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn create_video(&self, video: &VideoInsert) -> Result<VideoRecord, AppError> {
        (**self).create_video(video).await
    }

    async fn list_videos(&self) -> Result<Vec<VideoRecord>, AppError> {
        (**self).list_videos().await
    }
}

impl SqlxVideoRepo {
    pub fn new(database_url: impl Into<String>) -> Self {
        SqlxVideoRepo { database_url: database_url.into() }
    }
}

#[async_trait]
impl VideoRepository for SqlxVideoRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        let pool = get_connection(&self.database_url).await?;
        sqlx::query("SELECT 1")
            .execute(pool)
            .await?;

        Ok(())
    }

    async fn create_video(&self, video: &VideoInsert) -> Result<VideoRecord, AppError> {
        let pool = get_connection(&self.database_url).await?;
        let record = sqlx::query_as::<_, VideoRecord>(
            r#"
            INSERT INTO videos
                (title, description, asset_id, original_size, compressed_size, duration, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#
        )
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.asset_id)
        .bind(video.original_size)
        .bind(video.compressed_size)
        .bind(video.duration)
        .bind(video.created_at)
        .bind(video.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    async fn list_videos(&self) -> Result<Vec<VideoRecord>, AppError> {
        let pool = get_connection(&self.database_url).await?;
        let videos = sqlx::query_as::<_, VideoRecord>(
            r#"SELECT * FROM videos ORDER BY created_at DESC, id DESC"#
        )
        .fetch_all(pool)
        .await?;

        Ok(videos)
    }
}
