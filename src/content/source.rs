//! Content source adapter with a cache-or-fetch policy
//! `get_items` serves the cache when warm; `refresh_items` always goes back
//! to the loader and repopulates the cache.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::content::types::{QuizItem, ReelItem};

const BUNDLED_QUIZZES: &str = include_str!("../../fixtures/quizzes.json");
const BUNDLED_REELS: &str = include_str!("../../fixtures/reels.json");

/// One-shot producer of a full item list (network client, bundled data, ...)
#[async_trait]
pub trait ItemLoader<T>: Send + Sync {
    async fn load(&self) -> Result<Vec<T>>;
}

/// Ordered item provider as seen by the feed containers
#[async_trait]
pub trait ItemSource<T>: Send + Sync {
    /// Cache-first read of the catalog
    async fn get_items(&self) -> Result<Vec<T>>;
    /// Bypass the cache, reload, and repopulate it
    async fn refresh_items(&self) -> Result<Vec<T>>;
}

/// Caching adapter over an [`ItemLoader`]
pub struct CachedSource<T> {
    loader: Arc<dyn ItemLoader<T>>,
    cache: Mutex<Option<Vec<T>>>,
}

impl<T> CachedSource<T> {
    pub fn new(loader: Arc<dyn ItemLoader<T>>) -> Self {
        Self {
            loader,
            cache: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> ItemSource<T> for CachedSource<T> {
    async fn get_items(&self) -> Result<Vec<T>> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(items) = cache.as_ref() {
                return Ok(items.clone());
            }
        }
        self.refresh_items().await
    }

    async fn refresh_items(&self) -> Result<Vec<T>> {
        let items = self.loader.load().await?;
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Some(items.clone());
        }
        Ok(items)
    }
}

/// Loader serving a fixed in-memory list, optionally with simulated latency.
/// Backs the demo CLI (bundled fixtures) and tests.
pub struct StaticLoader<T> {
    items: Vec<T>,
    delay: Option<Duration>,
}

impl<T> StaticLoader<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, delay: None }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl StaticLoader<QuizItem> {
    /// Quiz catalog bundled with the binary
    pub fn bundled_quizzes() -> Result<Self> {
        let items = serde_json::from_str(BUNDLED_QUIZZES)
            .context("bundled quiz fixtures are malformed")?;
        Ok(Self::new(items))
    }
}

impl StaticLoader<ReelItem> {
    /// Reel catalog bundled with the binary
    pub fn bundled_reels() -> Result<Self> {
        let items =
            serde_json::from_str(BUNDLED_REELS).context("bundled reel fixtures are malformed")?;
        Ok(Self::new(items))
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> ItemLoader<T> for StaticLoader<T> {
    async fn load(&self) -> Result<Vec<T>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.items.clone())
    }
}
