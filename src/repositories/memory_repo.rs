//! In-memory stores used by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::post::{NewPost, Post};
use crate::models::user::{NewUser, User};
use super::RepoError;
use super::post_repository::PostStore;
use super::user_repository::UserStore;

#[derive(Default)]
pub struct MemoryPostStore {
    rows: Mutex<Vec<Post>>,
    fail_updates: AtomicBool,
}

impl MemoryPostStore {
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn count(&self) -> Result<i64, RepoError> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Post>, RepoError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let now = Utc::now();
        let stored = Post {
            id: Uuid::new_v4(),
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            creator: post.creator,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, post: &Post) -> Result<Post, RepoError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RepoError::Other("post store unavailable".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|p| p.id == post.id).ok_or(RepoError::NotFound)?;
        row.title = post.title.clone();
        row.content = post.content.clone();
        row.image_url = post.image_url.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() != before)
    }
}

/// User store whose `posts` updates can be made to fail, for exercising the
/// window between the post write and the user write.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
    fail_saves: AtomicBool,
}

impl MemoryUserStore {
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn update_posts(&self, id: Uuid, change: impl FnOnce(&mut User)) -> Result<(), RepoError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepoError::Other("user store unavailable".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|u| u.id == id).ok_or(RepoError::NotFound)?;
        change(row);
        row.updated_at = Utc::now();
        Ok(())
    }

    pub fn posts_of(&self, id: Uuid) -> Vec<Uuid> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.posts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let now = Utc::now();
        let stored = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            posts: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn add_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        self.update_posts(user_id, |user| user.add_post(post_id))
    }

    async fn remove_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        self.update_posts(user_id, |user| user.remove_post(post_id))
    }
}
