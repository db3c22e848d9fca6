use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TITLE_MIN: usize = 5;
const TITLE_MAX: usize = 200;
const CONTENT_MIN: usize = 5;
const CONTENT_MAX: usize = 10_000;

/// A single blog entry. `creator` never changes after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row to insert; id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub creator: Uuid,
}

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Title and content as submitted, trimmed on construction.
#[derive(Debug, Clone, Default)]
pub struct PostText {
    pub title: String,
    pub content: String,
}

impl PostText {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            content: content.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let title_len = self.title.chars().count();
        if title_len < TITLE_MIN {
            errors.push(FieldError::new(
                "title",
                format!("Title must be at least {} characters long", TITLE_MIN),
            ));
        } else if title_len > TITLE_MAX {
            errors.push(FieldError::new(
                "title",
                format!("Title must be less than {} characters", TITLE_MAX),
            ));
        }

        let content_len = self.content.chars().count();
        if content_len < CONTENT_MIN {
            errors.push(FieldError::new(
                "content",
                format!("Content must be at least {} characters long", CONTENT_MIN),
            ));
        } else if content_len > CONTENT_MAX {
            errors.push(FieldError::new(
                "content",
                format!("Content must be less than {} characters", CONTENT_MAX),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
