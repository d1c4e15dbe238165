use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    hash_password, verify_password, AuthResponse, AuthenticatedUser, LoginRequest,
    RegisterRequest, TokenKeys,
};
use crate::error::AppError;
use crate::models::{User, UserProfile};
use crate::store::Store;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Registration, login and token resolution.
pub struct AuthService {
    store: Arc<dyn Store>,
    tokens: TokenKeys,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenKeys, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }

    /// Creates a user and returns it with a fresh token.
    ///
    /// Fails with `Conflict` if the email is already registered. The store's
    /// uniqueness check is authoritative; the lookup up front only avoids
    /// hashing a password for a request that is bound to fail.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        if self.store.find_user_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let cost = self.bcrypt_cost;
        let password = request.password;
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;

        let user = self
            .store
            .insert_user(&User::new(request.name, request.email, password_hash))
            .await?;
        info!("Registered user {}", user.id);

        self.respond_with_token(&user)
    }

    /// Checks credentials and returns the user with a fresh token.
    ///
    /// Unknown email and wrong password produce the same `Unauthorized` error.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let user = match self.store.find_user_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                warn!("Failed login: no account for the given email");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };

        let password = request.password;
        let password_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
                .await??;
        if !matches {
            warn!("Failed login for user {}: wrong password", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        self.respond_with_token(&user)
    }

    pub async fn current_user(&self, id: Uuid) -> Result<UserProfile, AppError> {
        self.store
            .find_user_by_id(id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Verifies a bearer token and loads the user it names.
    pub async fn resolve_bearer(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.tokens.verify_token(token)?;
        self.store
            .find_user_by_id(claims.sub)
            .await?
            .map(|user| AuthenticatedUser::from(&user))
            .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".into()))
    }

    fn respond_with_token(&self, user: &User) -> Result<AuthResponse, AppError> {
        Ok(AuthResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            token: self.tokens.generate_token(user.id)?,
        })
    }
}
