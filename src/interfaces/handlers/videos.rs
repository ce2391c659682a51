use actix_web::{web, HttpResponse};

use crate::{entities::video::VideoUrlQuery, errors::AppError, AppState};

pub async fn list_videos(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let videos = state.video_handler.list_videos().await?;

    Ok(HttpResponse::Ok().json(videos))
}

pub async fn get_video_url(
    state: web::Data<AppState>,
    query: web::Query<VideoUrlQuery>,
) -> Result<HttpResponse, AppError> {
    let response = state.video_handler.video_url(query.asset_id.as_deref())?;

    Ok(HttpResponse::Ok().json(response))
}
