// src/repositories/post_repository.rs
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::models::post::{NewPost, Post};
use super::RepoError;

/// Persistence contract for posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn count(&self) -> Result<i64, RepoError>;
    /// Posts in listing order (oldest first), `limit` rows after skipping `offset`.
    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Post>, RepoError>;
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;
    /// Writes title, content and image_url back; returns the stored row.
    async fn update(&self, post: &Post) -> Result<Post, RepoError>;
    /// Returns false when there was nothing to delete.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}

const POST_COLUMNS: &str = "id, title, content, image_url, creator, created_at, updated_at";

pub struct PgPostStore {
    pool: Pool,
}

impl PgPostStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn row_to_post(row: &Row) -> Post {
    Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        image_url: row.get("image_url"),
        creator: row.get("creator"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn count(&self) -> Result<i64, RepoError> {
        let client = self.pool.get().await?;
        let row = client.query_one("SELECT COUNT(*) FROM posts", &[]).await?;
        Ok(row.get(0))
    }

    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Post>, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM posts ORDER BY created_at, id LIMIT $1 OFFSET $2",
            POST_COLUMNS
        );
        let rows = client.query(sql.as_str(), &[&limit, &offset]).await?;
        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO posts (id, title, content, image_url, creator) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            POST_COLUMNS
        );
        let id = Uuid::new_v4();
        let row = client
            .query_one(
                sql.as_str(),
                &[&id, &post.title, &post.content, &post.image_url, &post.creator],
            )
            .await?;
        Ok(row_to_post(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        Ok(row.as_ref().map(row_to_post))
    }

    async fn update(&self, post: &Post) -> Result<Post, RepoError> {
        let client = self.pool.get().await?;
        let sql = format!(
            "UPDATE posts SET title = $2, content = $3, image_url = $4, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            POST_COLUMNS
        );
        let row = client
            .query_opt(
                sql.as_str(),
                &[&post.id, &post.title, &post.content, &post.image_url],
            )
            .await?
            .ok_or(RepoError::NotFound)?;
        Ok(row_to_post(&row))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let client = self.pool.get().await?;
        let affected = client.execute("DELETE FROM posts WHERE id = $1", &[&id]).await?;
        Ok(affected > 0)
    }
}
