use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::AppState;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Task API is running")
}

/// Health check endpoint
///
/// Returns the API status, the active store backend and the current time.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "store": state.store.kind(),
        "timestamp": Utc::now()
    }))
}
