use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod uploads;
mod videos;
mod extractor_errors;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.configure(uploads::config_routes);
    cfg.configure(videos::config_routes);

    cfg.configure(extractor_errors::config_routes);
}
