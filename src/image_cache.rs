//! Crop-position hints for article images.
//!
//! Computing a hint may be expensive (face detection in the browser build),
//! so hints are cached per image URL in a bounded LRU.

use async_trait::async_trait;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::sync::Arc;
use tracing::debug;

use crate::models::{ImageRef, ImageSource};

pub const DEFAULT_POSITION: &str = "center 25%";

/// Computes an object-position hint for an image. Must be a pure function of
/// the URL.
#[async_trait]
pub trait CropHintProvider: Send + Sync {
    async fn position_for(&self, url: &str) -> String;
}

/// Provider used when no image analysis is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCropHint;

#[async_trait]
impl CropHintProvider for DefaultCropHint {
    async fn position_for(&self, _url: &str) -> String {
        DEFAULT_POSITION.to_string()
    }
}

/// URL → position hint, shared by every load in the process.
///
/// Two loads computing the same URL at once both run the provider and the
/// later insert wins; the value is the same either way.
#[derive(Clone)]
pub struct ImagePositionCache {
    cache: Cache<String, String>,
    provider: Arc<dyn CropHintProvider>,
}

impl ImagePositionCache {
    pub fn new(capacity: u64, provider: Arc<dyn CropHintProvider>) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { cache, provider }
    }

    pub async fn position(&self, url: &str) -> String {
        if let Some(hit) = self.cache.get(url) {
            return hit;
        }
        let position = self.provider.position_for(url).await;
        debug!("Computed crop hint - url={}, position={}", url, position);
        self.cache.insert(url.to_string(), position.clone());
        position
    }

    pub async fn image_ref(&self, source: ImageSource) -> ImageRef {
        let position = self.position(&source.url).await;
        ImageRef {
            url: source.url,
            caption: source.caption,
            position,
        }
    }
}
