use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row of the `users` table.
/// `posts` mirrors every post whose `creator` is this user; it is written
/// separately from the `posts` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub posts: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Struct for inserting a user at signup.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// What the client sees of a post's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatorSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&User> for CreatorSummary {
    fn from(user: &User) -> Self {
        Self { id: user.id, name: user.name.clone() }
    }
}

impl User {
    pub fn add_post(&mut self, post_id: Uuid) {
        if !self.posts.contains(&post_id) {
            self.posts.push(post_id);
        }
    }

    pub fn remove_post(&mut self, post_id: Uuid) {
        self.posts.retain(|id| *id != post_id);
    }
}
