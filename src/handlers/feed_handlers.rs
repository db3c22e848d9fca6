// src/handlers/feed_handlers.rs
use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web, HttpResponse, ResponseError};
use log::error;
use uuid::Uuid;

use crate::dtos::post_dtos::{DeletedPost, PageQuery, PostOut};
use crate::handlers::ApiResponse;
use crate::handlers::post_form::read_post_form;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::post::PostText;
use crate::services::feed_services::{FeedError, FeedService, PostUpdate};

impl ResponseError for FeedError {
    fn status_code(&self) -> StatusCode {
        match self {
            FeedError::Validation(_) | FeedError::MissingImage => StatusCode::UNPROCESSABLE_ENTITY,
            FeedError::NotFound => StatusCode::NOT_FOUND,
            FeedError::Forbidden => StatusCode::FORBIDDEN,
            FeedError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            FeedError::Validation(fields) => {
                ApiResponse::error(&self.to_string(), serde_json::to_value(fields).ok())
            }
            FeedError::Internal(detail) => {
                error!("feed request failed: {}", detail);
                ApiResponse::error("An internal error occurred.", None)
            }
            _ => ApiResponse::<serde_json::Value>::error(&self.to_string(), None),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Malformed ids are reported like unknown ones.
fn parse_post_id(raw: &str) -> Result<Uuid, FeedError> {
    Uuid::parse_str(raw.trim()).map_err(|_| FeedError::NotFound)
}

/// GET /feed/posts?page=N
#[get("/posts")]
pub async fn list_posts(
    feed: web::Data<FeedService>,
    _user: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, FeedError> {
    let page = feed.list_posts(query.page_number()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Fetched posts successfully.", page)))
}

/// POST /feed/post (multipart: title, content, image)
#[post("/post")]
pub async fn create_post(
    feed: web::Data<FeedService>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse, FeedError> {
    let form = read_post_form(payload, feed.max_image_bytes()).await?;
    let created = feed
        .create_post(user.user_id, PostText::new(&form.title, &form.content), form.image)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Post created successfully!", created)))
}

/// GET /feed/post/{post_id}
#[get("/post/{post_id}")]
pub async fn get_post(
    feed: web::Data<FeedService>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, FeedError> {
    let post_id = parse_post_id(&path)?;
    let post = feed.get_post(post_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Post fetched.", PostOut { post })))
}

/// PUT /feed/post/{post_id} (multipart: title, content, image file or reference)
#[put("/post/{post_id}")]
pub async fn update_post(
    feed: web::Data<FeedService>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, FeedError> {
    let post_id = parse_post_id(&path)?;
    let form = read_post_form(payload, feed.max_image_bytes()).await?;
    let update = PostUpdate {
        text: PostText::new(&form.title, &form.content),
        image: form.image,
        image_ref: form.image_ref,
    };
    let post = feed.update_post(user.user_id, post_id, update).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Post updated!", PostOut { post })))
}

/// DELETE /feed/post/{post_id}
#[delete("/post/{post_id}")]
pub async fn delete_post(
    feed: web::Data<FeedService>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, FeedError> {
    let post_id = parse_post_id(&path)?;
    let post_id = feed.delete_post(user.user_id, post_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Deleted post.", DeletedPost { post_id })))
}
