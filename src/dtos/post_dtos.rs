use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::post::Post;
use crate::models::user::CreatorSummary;

/// `?page=` as sent by the client; anything unparsable means page 1.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page_number(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total_items: i64,
}

#[derive(Debug, Serialize)]
pub struct CreatedPost {
    pub post: Post,
    pub creator: CreatorSummary,
}

#[derive(Debug, Serialize)]
pub struct PostOut {
    pub post: Post,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPost {
    pub post_id: Uuid,
}
