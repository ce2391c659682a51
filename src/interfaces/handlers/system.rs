use actix_web::{web, get, HttpResponse, Responder};
use humantime::format_duration;
use once_cell::sync::Lazy;
use chrono::Utc;
use std::{
    time::Duration,
    sync::{atomic::{AtomicI64, Ordering}, RwLock},
};
use serde::Serialize;
use crate::{constants::START_TIME, repositories::video::VideoRepository, AppState};

#[derive(Serialize, Clone, Default)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    database: String,
    version: String,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_STATUS: Lazy<RwLock<HealthCheckResponse>> = Lazy::new(||
    RwLock::new(HealthCheckResponse::default())
);

async fn build_health_response(state: &web::Data<AppState>) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime_duration = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime_duration.num_seconds().max(0) as u64));

    let db_status = match state.video_handler.video_repo.check_connection().await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::warn!("Health check database probe failed: {}", e);
            "Unavailable"
        }
    };

    HealthCheckResponse {
        status: "healthy".to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        database: db_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

// The database probe is cached for a few seconds so the endpoint can be polled freely
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last > 5 {
        let response = build_health_response(&state).await;

        if let Ok(mut cache) = CACHED_STATUS.write() {
            *cache = response.clone();
            LAST_CHECK.store(now, Ordering::Relaxed);
        }

        HttpResponse::Ok().json(response)
    } else {
        match CACHED_STATUS.read() {
            Ok(response) => HttpResponse::Ok().json(response.clone()),
            Err(e) => {
                tracing::warn!("HealthCheck cache lock poisoned: {}", e);
                drop(e);
                let response = build_health_response(&state).await;
                HttpResponse::Ok().json(response)
            }
        }
    }
}
