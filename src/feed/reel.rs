//! Reel feed container: likes, bookmarks, and per-item mute flags
//! Mute is asymmetric on purpose: an item with no recorded flag counts as
//! muted, so autoplaying video starts silent.

use std::sync::Arc;

use crate::content::{FeedKind, ItemSource, ReelItem};
use crate::feed::state::{FeedCore, FeedPhase};
use crate::progress::FeedStatistics;
use crate::storage::gateway::FlagMap;
use crate::storage::PersistenceGateway;

/// Persisted-owned slice of reel feed state, as restored at startup.
/// Same ownership split as the quiz snapshot: maps and stats come from
/// storage, everything else is session-owned and always wins.
pub(crate) struct ReelSnapshot {
    pub likes: FlagMap,
    pub bookmarks: FlagMap,
    pub muted: FlagMap,
    pub stats: FeedStatistics,
}

/// In-memory authoritative state for the reel feed
pub struct ReelFeed {
    core: FeedCore<ReelItem>,
    likes: FlagMap,
    bookmarks: FlagMap,
    muted: FlagMap,
    source: Arc<dyn ItemSource<ReelItem>>,
    gateway: Arc<PersistenceGateway>,
}

impl ReelFeed {
    /// Construct the container and restore persisted interaction flags
    /// before it is exposed to any caller
    pub async fn hydrate(
        gateway: Arc<PersistenceGateway>,
        source: Arc<dyn ItemSource<ReelItem>>,
    ) -> Self {
        let snapshot = ReelSnapshot {
            likes: gateway.load_reel_likes().await,
            bookmarks: gateway.load_reel_bookmarks().await,
            muted: gateway.load_reel_muted().await,
            stats: gateway.load_feed_statistics(FeedKind::Reel).await,
        };
        let mut feed = Self {
            core: FeedCore::new(FeedKind::Reel),
            likes: FlagMap::new(),
            bookmarks: FlagMap::new(),
            muted: FlagMap::new(),
            source,
            gateway,
        };
        feed.merge_persisted(snapshot);
        feed
    }

    pub(crate) fn merge_persisted(&mut self, snapshot: ReelSnapshot) {
        self.likes = snapshot.likes;
        self.bookmarks = snapshot.bookmarks;
        self.muted = snapshot.muted;
        self.core.stats = snapshot.stats;
    }

    pub fn items(&self) -> &[ReelItem] {
        &self.core.items
    }

    pub fn loading(&self) -> bool {
        self.core.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.core.error.as_deref()
    }

    pub fn phase(&self) -> FeedPhase {
        self.core.phase()
    }

    pub fn current_index(&self) -> usize {
        self.core.current_index
    }

    pub fn stats(&self) -> &FeedStatistics {
        &self.core.stats
    }

    pub fn likes(&self) -> &FlagMap {
        &self.likes
    }

    pub fn bookmarks(&self) -> &FlagMap {
        &self.bookmarks
    }

    pub fn is_liked(&self, item_id: &str) -> bool {
        self.likes.get(item_id).copied().unwrap_or(false)
    }

    pub fn is_bookmarked(&self, item_id: &str) -> bool {
        self.bookmarks.contains_key(item_id)
    }

    /// Absent flag means muted
    pub fn is_muted(&self, item_id: &str) -> bool {
        self.muted.get(item_id).copied().unwrap_or(true)
    }

    /// Cache-first load; cursor rebased onto the persisted high-water mark
    pub async fn fetch(&mut self) {
        let generation = self.core.begin_load(true);
        match self.source.get_items().await {
            Ok(items) => {
                self.core.apply_items(generation, items, true);
            }
            Err(e) => {
                self.core
                    .apply_error(generation, format!("Failed to load reels: {}", e));
            }
        }
    }

    /// Cache-bypassing reload; keeps the live cursor (clamped into bounds)
    pub async fn refresh(&mut self) {
        let generation = self.core.begin_load(false);
        match self.source.refresh_items().await {
            Ok(items) => {
                self.core.apply_items(generation, items, false);
            }
            Err(e) => {
                self.core
                    .apply_error(generation, format!("Failed to refresh reels: {}", e));
            }
        }
    }

    pub async fn set_current_index(&mut self, index: usize) {
        if self.core.set_current_index(index) {
            self.persist_stats().await;
        }
    }

    /// Flip the like flag; likes keep an explicit boolean per item
    pub async fn toggle_like(&mut self, item_id: &str) {
        let next = !self.is_liked(item_id);
        self.likes.insert(item_id.to_string(), next);
        self.gateway.save_reel_likes(&self.likes).await;
    }

    /// Flip the bookmark flag; unset bookmarks are removed from the map
    pub async fn toggle_bookmark(&mut self, item_id: &str) {
        if self.bookmarks.remove(item_id).is_none() {
            self.bookmarks.insert(item_id.to_string(), true);
        }
        self.gateway.save_reel_bookmarks(&self.bookmarks).await;
    }

    /// Flip the mute flag (absent reads as muted) and return the new value,
    /// which drives the playback side effect in the presentation layer
    pub async fn toggle_mute(&mut self, item_id: &str) -> bool {
        let next = !self.is_muted(item_id);
        self.muted.insert(item_id.to_string(), next);
        self.gateway.save_reel_muted(&self.muted).await;
        next
    }

    /// Clear likes, bookmarks, mute flags, and statistics; items are kept
    pub async fn reset_progress(&mut self) {
        self.likes.clear();
        self.bookmarks.clear();
        self.muted.clear();
        self.core.stats = FeedStatistics::default();
        self.gateway.save_reel_likes(&self.likes).await;
        self.gateway.save_reel_bookmarks(&self.bookmarks).await;
        self.gateway.save_reel_muted(&self.muted).await;
        self.persist_stats().await;
    }

    async fn persist_stats(&self) {
        self.gateway
            .save_feed_statistics(FeedKind::Reel, &self.core.stats)
            .await;
    }
}
