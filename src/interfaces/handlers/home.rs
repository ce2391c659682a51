use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Media ingest API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/upload/image", "/upload/video", "/videos", "/video?assetId=", "/health"]
    }))
}
