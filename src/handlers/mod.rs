pub mod auth_handlers;
pub mod feed_handlers;
pub mod post_form;

use serde::Serialize;

/// Envelope shared by every JSON response.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: &str, data: Option<T>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.to_string(),
            data,
        }
    }
}
