//! Image store that keeps names in memory and records every deletion.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{ImageStore, UploadedImage, last_component};

#[derive(Default)]
pub struct RecordingImageStore {
    next: AtomicUsize,
    saved: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingImageStore {
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn save(&self, image: UploadedImage) -> anyhow::Result<String> {
        let url = format!("/images/{}-{}", self.next.fetch_add(1, Ordering::SeqCst), image.file_name);
        // Suspends once, like a real write.
        tokio::task::yield_now().await;
        self.saved.lock().unwrap().push(url.clone());
        Ok(url)
    }

    async fn delete(&self, image_url: &str) -> anyhow::Result<()> {
        self.deleted.lock().unwrap().push(image_url.to_string());
        let mut saved = self.saved.lock().unwrap();
        let before = saved.len();
        saved.retain(|u| u != image_url);
        if saved.len() == before {
            anyhow::bail!("no such image: {}", image_url);
        }
        Ok(())
    }

    fn canonical_url(&self, reference: &str) -> Option<String> {
        last_component(reference).map(|name| format!("/images/{}", name))
    }
}
