use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;

/// Identity of the caller, resolved by `AuthMiddleware`.
///
/// The middleware inserts this into the request extensions after verifying the
/// bearer token and loading the user. Handlers take it as an argument; if it is
/// missing (the route is not behind the middleware) extraction fails with
/// `AppError::Unauthorized`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthorized("Not authorized, no token".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
