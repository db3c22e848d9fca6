//! Filesystem implementation of `ImageStore`.
//! Files are written flat into one directory, which is also served
//! read-only under `url_prefix`.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use tokio::fs;

use super::{ImageStore, UploadedImage, last_component};

pub struct LocalImageStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalImageStore {
    pub fn new(root: PathBuf, url_prefix: &str) -> Self {
        Self {
            root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// `<ISO-8601 timestamp>-<original name>`, unique per millisecond.
    fn file_name_for(original: &str, at: DateTime<Utc>) -> String {
        let base = last_component(original).unwrap_or("image");
        format!("{}-{}", at.to_rfc3339_opts(SecondsFormat::Millis, true), base)
    }

    fn path_for(&self, image_url: &str) -> Option<PathBuf> {
        last_component(image_url).map(|name| self.root.join(name))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, image: UploadedImage) -> anyhow::Result<String> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let file_name = Self::file_name_for(&image.file_name, Utc::now());
        let target = self.root.join(&file_name);
        fs::write(&target, &image.bytes)
            .await
            .with_context(|| format!("failed to write {}", target.display()))?;

        debug!(
            "stored {} image {} ({} bytes)",
            image.content_type,
            target.display(),
            image.bytes.len()
        );
        Ok(format!("{}/{}", self.url_prefix, file_name))
    }

    async fn delete(&self, image_url: &str) -> anyhow::Result<()> {
        let path = self
            .path_for(image_url)
            .with_context(|| format!("not an image reference: {}", image_url))?;
        fs::remove_file(&path)
            .await
            .with_context(|| format!("failed to remove {}", path.display()))?;
        debug!("removed image {}", path.display());
        Ok(())
    }

    fn canonical_url(&self, reference: &str) -> Option<String> {
        last_component(reference).map(|name| format!("{}/{}", self.url_prefix, name))
    }
}
