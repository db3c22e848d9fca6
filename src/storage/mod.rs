//! # Image storage
//!
//! Uploaded post images live outside the database; posts only keep the
//! public reference returned by [`ImageStore::save`].

pub mod local_image_store;

#[cfg(test)]
pub mod memory_image_store;

use async_trait::async_trait;
use mime::Mime;

/// Image file accepted from a multipart upload, not yet persisted.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// File name as sent by the client.
    pub file_name: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}

/// Storage contract for post images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persists the image and returns its public reference.
    async fn save(&self, image: UploadedImage) -> anyhow::Result<String>;
    /// Removes the file behind a public reference.
    async fn delete(&self, image_url: &str) -> anyhow::Result<()>;
    /// Normalises a client supplied reference to the form `save` returns.
    fn canonical_url(&self, reference: &str) -> Option<String>;
}

const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpg", "image/jpeg"];

/// Upload filter: only PNG and JPEG files are kept.
pub fn is_accepted_image(content_type: &Mime) -> bool {
    ACCEPTED_IMAGE_TYPES.contains(&content_type.essence_str())
}

/// Final path component of a client supplied name, if it has a usable one.
pub(crate) fn last_component(name: &str) -> Option<&str> {
    name.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
}
