use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::error::AppError;
use crate::AppState;

/// Paths under the protected scope that do not require a token.
const PUBLIC_PATHS: &[&str] = &["/api/auth/register", "/api/auth/login"];

/// Bearer-token gate for the `/api` scope.
///
/// Verifies the token, resolves its subject to a stored user and inserts an
/// [`AuthenticatedUser`](super::AuthenticatedUser) into the request extensions.
/// Any failure answers 401 and the wrapped service is never called.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if PUBLIC_PATHS.contains(&req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) });
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match authenticate(&req).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    service
                        .call(req)
                        .await
                        .map(|res| res.map_into_left_body())
                }
                Err(err) => {
                    log::debug!("Rejected request to {}: {}", req.path(), err);
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> Result<super::AuthenticatedUser, AppError> {
    let token = bearer_token(req)
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".into()))?;
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError("Application state is not registered".into()))?;

    state.auth.resolve_bearer(&token).await
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}
