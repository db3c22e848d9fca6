//! Multipart body of the create and update routes.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::http::header::{self, ContentDisposition};
use futures::StreamExt;
use log::debug;
use mime::Mime;

use crate::models::post::FieldError;
use crate::services::feed_services::FeedError;
use crate::storage::{UploadedImage, is_accepted_image};

const TEXT_FIELD_MAX: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    /// `image` sent as plain text: reference to an already stored image.
    pub image_ref: Option<String>,
    /// `image` sent as a file that passed the upload filter.
    pub image: Option<UploadedImage>,
}

pub async fn read_post_form(mut payload: Multipart, max_image_bytes: usize) -> Result<PostForm, FeedError> {
    let mut form = PostForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(malformed)?;

        let disposition = field
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| ContentDisposition::from_raw(v).ok());
        let name = disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let file_name = disposition
            .as_ref()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let label = match name.as_str() {
            "title" => "title",
            "content" => "content",
            "image" => "image",
            _ => "body",
        };

        if let Some(file_name) = file_name {
            let content_type = field
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<Mime>().ok())
                .filter(is_accepted_image);

            match content_type {
                Some(content_type) if label == "image" => {
                    let bytes = read_limited(&mut field, max_image_bytes, label).await?;
                    form.image = Some(UploadedImage { file_name, content_type, bytes });
                }
                _ => {
                    debug!("dropping upload {:?} sent as field {:?}", file_name, name);
                    drain(&mut field).await?;
                }
            }
            continue;
        }

        let bytes = read_limited(&mut field, TEXT_FIELD_MAX, label).await?;
        let value = String::from_utf8(bytes)
            .map_err(|_| FeedError::Validation(vec![FieldError::new(label, "must be valid UTF-8")]))?;
        match label {
            "title" => form.title = value,
            "content" => form.content = value,
            "image" => form.image_ref = Some(value).filter(|v| !v.trim().is_empty()),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_limited(field: &mut Field, limit: usize, label: &'static str) -> Result<Vec<u8>, FeedError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        if buf.len() + chunk.len() > limit {
            return Err(FeedError::Validation(vec![FieldError::new(
                label,
                format!("must be at most {} bytes", limit),
            )]));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

async fn drain(field: &mut Field) -> Result<(), FeedError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(malformed)?;
    }
    Ok(())
}

fn malformed(e: MultipartError) -> FeedError {
    FeedError::Validation(vec![FieldError::new("body", format!("Malformed multipart body: {}", e))])
}
