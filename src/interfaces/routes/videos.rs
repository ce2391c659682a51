use actix_web::web;

use crate::handlers::videos;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/videos")
            .route(web::get().to(videos::list_videos))
    );
    cfg.service(
        web::resource("/video")
            .route(web::get().to(videos::get_video_url))
    );
}
