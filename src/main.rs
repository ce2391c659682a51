use std::{env, str::FromStr};

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use media_ingest::{
    graceful_shutdown::stop_on_signal,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    telemetry::init_tracing,
    AppState
};

fn build_cors(origins: &[String]) -> Cors {
    if origins.iter().any(|o| o == "*") {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let env_name = env::var("APP_ENV")
        .ok()
        .and_then(|raw| AppEnvironment::from_str(&raw).ok())
        .unwrap_or(AppEnvironment::Development);
    init_tracing(&env_name);

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Failed to build media store client: {}", e);
            std::process::exit(1);
        }
    };

    let server_addr = format!("{}:{}", config.host, config.port);
    let cors_origins = config.cors_origins();

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(build_cors(&cors_origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(server_addr)?
    .run();

    tokio::spawn(stop_on_signal(server.handle()));

    server.await
}
