// src/repositories/user_repository.rs
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::models::user::{NewUser, User};
use super::RepoError;

/// Persistence contract for users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    /// Adds `post_id` to the user's `posts` set in one statement.
    async fn add_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError>;
    async fn remove_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError>;
}

const USER_COLUMNS: &str = "id, email, name, password_hash, posts, created_at, updated_at";

pub struct PgUserStore {
    pool: Pool,
}

impl PgUserStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn update_posts(&self, sql: &str, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        let client = self.pool.get().await?;
        let affected = client.execute(sql, &[&user_id, &post_id]).await?;
        if affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

fn row_to_user(row: &Row) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        posts: row.get("posts"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO users (id, email, name, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        let id = Uuid::new_v4();
        let row = client
            .query_one(sql.as_str(), &[&id, &user.email, &user.name, &user.password_hash])
            .await?;
        Ok(row_to_user(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&email]).await?;
        Ok(row.as_ref().map(row_to_user))
    }

    async fn add_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        self.update_posts(
            "UPDATE users SET posts = CASE WHEN $2 = ANY(posts) THEN posts \
             ELSE array_append(posts, $2) END, updated_at = now() WHERE id = $1",
            user_id,
            post_id,
        )
        .await
    }

    async fn remove_post(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        self.update_posts(
            "UPDATE users SET posts = array_remove(posts, $2), updated_at = now() WHERE id = $1",
            user_id,
            post_id,
        )
        .await
    }
}
