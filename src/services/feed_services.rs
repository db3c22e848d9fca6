// src/services/feed_services.rs
//
// Post lifecycle: list, create, read, update and delete posts while keeping
// `users.posts` and the image directory in step with the `posts` table.
// The post write and the user write are separate commits; a failure between
// them is reported to the caller but not rolled back.

use std::sync::Arc;

use log::{error, info, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::post_dtos::{CreatedPost, PostPage};
use crate::models::post::{FieldError, NewPost, Post, PostText};
use crate::models::user::{CreatorSummary, User};
use crate::repositories::RepoError;
use crate::repositories::post_repository::PostStore;
use crate::repositories::user_repository::UserStore;
use crate::storage::{ImageStore, UploadedImage};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Validation failed, entered data is incorrect.")]
    Validation(Vec<FieldError>),
    #[error("No image provided.")]
    MissingImage,
    #[error("Could not find post.")]
    NotFound,
    #[error("Not authorized.")]
    Forbidden,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for FeedError {
    fn from(e: RepoError) -> Self {
        FeedError::Internal(e.to_string())
    }
}

impl From<anyhow::Error> for FeedError {
    fn from(e: anyhow::Error) -> Self {
        FeedError::Internal(format!("{:#}", e))
    }
}

/// Replacement values for an existing post. A new file wins over `image_ref`.
#[derive(Debug, Default)]
pub struct PostUpdate {
    pub text: PostText,
    pub image: Option<UploadedImage>,
    pub image_ref: Option<String>,
}

pub struct FeedService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
    images: Arc<dyn ImageStore>,
    per_page: i64,
    max_image_bytes: usize,
}

impl FeedService {
    pub fn new(state: &AppState, per_page: i64, max_image_bytes: usize) -> Self {
        Self {
            posts: state.posts.clone(),
            users: state.users.clone(),
            images: state.images.clone(),
            per_page: per_page.max(1),
            max_image_bytes,
        }
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    /// `page` is 1-based; `total_items` counts every post, not just the page.
    pub async fn list_posts(&self, page: u32) -> Result<PostPage, FeedError> {
        let page = i64::from(page.max(1));
        let total_items = self.posts.count().await?;
        let posts = self
            .posts
            .list_page(self.per_page, (page - 1).saturating_mul(self.per_page))
            .await?;
        Ok(PostPage { posts, total_items })
    }

    pub async fn create_post(
        &self,
        actor: Uuid,
        text: PostText,
        image: Option<UploadedImage>,
    ) -> Result<CreatedPost, FeedError> {
        text.validate().map_err(FeedError::Validation)?;
        let image = image.ok_or(FeedError::MissingImage)?;
        let user = self.load_actor(actor).await?;

        let image_url = self.images.save(image).await?;
        let post = match self
            .posts
            .insert(NewPost {
                title: text.title,
                content: text.content,
                image_url: image_url.clone(),
                creator: actor,
            })
            .await
        {
            Ok(post) => post,
            Err(e) => {
                self.discard_image(&image_url).await;
                return Err(e.into());
            }
        };
        info!("post {} created by {}", post.id, actor);

        if let Err(e) = self.users.add_post(actor, post.id).await {
            error!("post {} stored but not linked to user {}: {}", post.id, actor, e);
            return Err(e.into());
        }

        Ok(CreatedPost {
            creator: CreatorSummary::from(&user),
            post,
        })
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post, FeedError> {
        self.posts.find_by_id(post_id).await?.ok_or(FeedError::NotFound)
    }

    /// Ownership is checked before the input, so a non-owner is always refused.
    pub async fn update_post(
        &self,
        actor: Uuid,
        post_id: Uuid,
        update: PostUpdate,
    ) -> Result<Post, FeedError> {
        let mut post = self.owned_post(actor, post_id).await?;
        update.text.validate().map_err(FeedError::Validation)?;

        let (image_url, uploaded) = match (update.image, update.image_ref) {
            (Some(file), _) => (self.images.save(file).await?, true),
            (None, Some(reference)) => (self.resolve_reference(&post, &reference)?, false),
            (None, None) => return Err(FeedError::MissingImage),
        };

        let old_image = std::mem::replace(&mut post.image_url, image_url);
        post.title = update.text.title;
        post.content = update.text.content;

        match self.posts.update(&post).await {
            Ok(updated) => {
                if updated.image_url != old_image {
                    self.discard_image(&old_image).await;
                }
                info!("post {} updated by {}", post_id, actor);
                Ok(updated)
            }
            Err(e) => {
                if uploaded {
                    self.discard_image(&post.image_url).await;
                }
                match e {
                    RepoError::NotFound => Err(FeedError::NotFound),
                    e => Err(e.into()),
                }
            }
        }
    }

    pub async fn delete_post(&self, actor: Uuid, post_id: Uuid) -> Result<Uuid, FeedError> {
        let post = self.owned_post(actor, post_id).await?;

        self.discard_image(&post.image_url).await;
        if !self.posts.delete(post_id).await? {
            return Err(FeedError::NotFound);
        }

        if let Err(e) = self.users.remove_post(actor, post_id).await {
            error!("post {} deleted but still listed on user {}: {}", post_id, actor, e);
            return Err(e.into());
        }

        info!("post {} deleted by {}", post_id, actor);
        Ok(post_id)
    }

    async fn owned_post(&self, actor: Uuid, post_id: Uuid) -> Result<Post, FeedError> {
        let post = self.get_post(post_id).await?;
        if post.creator != actor {
            warn!("user {} tried to modify post {} owned by {}", actor, post_id, post.creator);
            return Err(FeedError::Forbidden);
        }
        Ok(post)
    }

    async fn load_actor(&self, actor: Uuid) -> Result<User, FeedError> {
        self.users
            .find_by_id(actor)
            .await?
            .ok_or_else(|| FeedError::Internal(format!("no user record for {}", actor)))
    }

    /// A reference can only keep the post's own image; files are never shared.
    fn resolve_reference(&self, post: &Post, reference: &str) -> Result<String, FeedError> {
        match self.images.canonical_url(reference) {
            Some(url) if url == post.image_url => Ok(url),
            _ => Err(FeedError::MissingImage),
        }
    }

    async fn discard_image(&self, image_url: &str) {
        if let Err(e) = self.images.delete(image_url).await {
            warn!("could not remove image {}: {:#}", image_url, e);
        }
    }
}
