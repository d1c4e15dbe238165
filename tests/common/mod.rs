#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{http::header, test, web};
use serde_json::json;

use taskhub::auth::AuthResponse;
use taskhub::config::Config;
use taskhub::store::MemoryStore;
use taskhub::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Config for tests: memory store, cheap bcrypt.
pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .expect("test config")
}

pub fn test_state() -> (web::Data<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = web::Data::new(AppState::new(store.clone(), &test_config()));
    (state, store)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers a user through the API and returns the auth response.
pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> AuthResponse {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::CREATED,
        "registration of {} failed",
        email
    );
    test::read_body_json(resp).await
}
