use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{post, put, web, HttpRequest, HttpResponse, ResponseError};
use log::error;

use crate::dtos::auth::{LoginIn, SignupIn, SignupOut};
use crate::handlers::ApiResponse;
use crate::models::post::FieldError;
use crate::services::auth_services::{AuthError, AuthService};

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Repo(_) | AuthError::Token(_) | AuthError::Hash(_) | AuthError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AuthError::Validation(fields) => {
                ApiResponse::error(&self.to_string(), serde_json::to_value(fields).ok())
            }
            AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidToken => {
                ApiResponse::<serde_json::Value>::error(&self.to_string(), None)
            }
            _ => {
                error!("auth request failed: {}", self);
                ApiResponse::error("An internal error occurred.", None)
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Unreadable JSON bodies answer with the usual validation envelope.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AuthError::Validation(vec![FieldError::new("body", err.to_string())]).into()
}

/// PUT /auth/signup
#[put("/signup")]
pub async fn signup(
    svc: web::Data<AuthService>,
    body: web::Json<SignupIn>,
) -> Result<HttpResponse, AuthError> {
    let user = svc.signup(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "User created!",
        SignupOut { user_id: user.id },
    )))
}

/// POST /auth/login
#[post("/login")]
pub async fn login(
    svc: web::Data<AuthService>,
    body: web::Json<LoginIn>,
) -> Result<HttpResponse, AuthError> {
    let session = svc.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Login successful", session)))
}
