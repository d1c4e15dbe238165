use crate::{
    auth::{AuthenticatedUser, LoginRequest, RegisterRequest},
    error::AppError,
    AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new user account and returns it with an authentication token.
///
/// ## Responses:
/// - `201 Created`: `{id, name, email, token}`.
/// - `400 Bad Request`: missing or invalid fields, or the email is already
///   registered ("User already exists").
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.auth.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{id, name, email, token}`.
/// - `400 Bad Request`: missing fields.
/// - `401 Unauthorized`: unknown email or wrong password (same message for both).
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = state.auth.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Profile of the authenticated caller.
#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let profile = state.auth.current_user(user.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
