use actix_web::HttpResponse;
use chrono::Utc;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "notify-api",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
