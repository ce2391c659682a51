use actix_web::web;

use crate::handlers::uploads;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/upload")
            .service(
                web::resource("/image")
                    .route(web::post().to(uploads::upload_image))
            )
            .service(
                web::resource("/video")
                    .route(web::post().to(uploads::upload_video))
            )
    );
}
