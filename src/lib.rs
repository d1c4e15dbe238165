#![doc = "The `taskhub` library crate."]
#![doc = ""]
#![doc = "User registration and login with bearer tokens, plus task CRUD where every"]
#![doc = "task is visible to and mutable by its owner only. The binary (`main.rs`)"]
#![doc = "loads the configuration, opens the store and serves [`build_app`]."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{DefaultHeaders, Logger},
    web, App,
};

use crate::auth::{AuthMiddleware, TokenKeys};
use crate::config::Config;
use crate::error::AppError;
use crate::services::{AuthService, TaskService};
use crate::store::Store;

/// Shared, explicitly constructed application state.
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub store: Arc<dyn Store>,
    pub cors_origin: Option<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        let tokens = TokenKeys::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::days(config.token_ttl_days),
        );
        Self {
            auth: AuthService::new(store.clone(), tokens, config.bcrypt_cost),
            tasks: TaskService::new(store.clone()),
            store,
            cors_origin: config.cors_origin.clone(),
        }
    }
}

/// Builds the actix-web application: middleware, extractor error handlers and
/// routes. Used by `main` and by the integration tests.
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = match &state.cors_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    }
    .allow_any_method()
    .allow_any_header()
    .max_age(3600);

    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());
    // Anything that is not a task id cannot name a task.
    let path_config = web::PathConfig::default()
        .error_handler(|_err, _req| AppError::NotFound("Task not found".into()).into());

    App::new()
        .app_data(state)
        .app_data(json_config)
        .app_data(path_config)
        .wrap(cors)
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("X-Frame-Options", "DENY")),
        )
        .wrap(Logger::default())
        .service(routes::health::index)
        .service(routes::health::health)
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .configure(routes::config),
        )
}
