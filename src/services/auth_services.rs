// src/services/auth_services.rs
use std::sync::{Arc, LazyLock};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dtos::auth::{LoginIn, SessionOut, SignupIn};
use crate::models::post::FieldError;
use crate::models::user::{NewUser, User};
use crate::repositories::RepoError;
use crate::repositories::user_repository::UserStore;

const PASSWORD_MIN: usize = 5;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
});

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed.")]
    Validation(Vec<FieldError>),
    #[error("Wrong email or password.")]
    InvalidCredentials,
    #[error("Not authenticated.")]
    MissingToken,
    #[error("Invalid or expired token.")]
    InvalidToken,
    #[error("repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("other: {0}")]
    Other(String),
}

/// JWT payload handed out at login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: String,
    email: String,
    exp: i64,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: &str, token_ttl_hours: i64) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.to_string(),
            token_ttl: Duration::hours(token_ttl_hours.max(1)),
        }
    }

    pub async fn signup(&self, input: SignupIn) -> Result<User, AuthError> {
        let email = input.email.trim().to_lowercase();
        let name = input.name.trim().to_string();
        let password = input.password.trim();

        let mut errors = Vec::new();
        if !EMAIL_RE.is_match(&email) {
            errors.push(FieldError::new("email", "Please enter a valid email."));
        } else if self.users.find_by_email(&email).await?.is_some() {
            errors.push(FieldError::new("email", "E-Mail address already exists!"));
        }
        if password.chars().count() < PASSWORD_MIN {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {} characters long", PASSWORD_MIN),
            ));
        }
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(NewUser { email, name, password_hash })
            .await?;
        info!("user {} signed up", user.id);
        Ok(user)
    }

    pub async fn login(&self, input: LoginIn) -> Result<SessionOut, AuthError> {
        let email = input.email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(input.password.trim(), &user.password_hash) {
            debug!("wrong password for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok(SessionOut { token, user_id: user.id })
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims {
            user_id: user.id.to_string(),
            email: user.email.clone(),
            exp: (Utc::now() + self.token_ttl).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn verify_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            debug!("rejected token: {}", e);
            AuthError::InvalidToken
        })?;
        Uuid::parse_str(&data.claims.user_id).map_err(|_| AuthError::InvalidToken)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
