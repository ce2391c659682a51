use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{web, HttpResponse};

use crate::{
    entities::{
        image::ImageUploadForm,
        upload::{ImageUploadResponse, UploadMetadata, UploadRequest},
        video::{parse_declared_size, VideoUploadForm, VideoUploadResponse},
    },
    errors::AppError,
    AppState,
};

pub async fn upload_image(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<ImageUploadForm>,
) -> Result<HttpResponse, AppError> {
    let request = read_upload(form.file).await?;

    let result = state.ingest_handler.upload_image(request).await?;

    Ok(HttpResponse::Ok().json(ImageUploadResponse::from(result)))
}

pub async fn upload_video(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<VideoUploadForm>,
) -> Result<HttpResponse, AppError> {
    let original_size = form.original_size.map(|t| t.into_inner());
    let metadata = UploadMetadata {
        title: form.title.map(|t| t.into_inner()),
        description: form.description.map(|t| t.into_inner()),
        original_size: parse_declared_size(original_size.as_deref()),
    };

    let request = read_upload(form.file).await?.with_metadata(metadata);

    let result = state.ingest_handler.upload_video(request).await?;

    let compressed_url = result.renditions.first().map(|r| r.url.clone());
    Ok(HttpResponse::Ok().json(VideoUploadResponse {
        message: "Video uploaded successfully".to_string(),
        asset_id: result.asset_id,
        original_url: result.url,
        compressed_url,
    }))
}

/// Buffers the spooled multipart file fully into memory.
async fn read_upload(file: Option<TempFile>) -> Result<UploadRequest, AppError> {
    let file = file.ok_or_else(|| AppError::validation("file", "No file uploaded"))?;

    let payload = tokio::fs::read(file.file.path()).await?;
    let content_type = file.content_type.as_ref().map(|m| m.essence_str().to_string());

    Ok(UploadRequest::new(payload, content_type).with_file_name(file.file_name))
}
