// src/middleware/auth_extractor.rs
use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::services::auth_services::{AuthError, AuthService};

/// User yang tokennya sudah diverifikasi
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<AuthenticatedUser, AuthError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
    let svc = req
        .app_data::<web::Data<AuthService>>()
        .ok_or_else(|| AuthError::Other("auth service is not registered".to_string()))?;

    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let header = header.to_str().map_err(|_| AuthError::InvalidToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidToken)?;

    let user_id = svc.verify_token(token)?;
    Ok(AuthenticatedUser { user_id })
}
