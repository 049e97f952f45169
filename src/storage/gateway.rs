//! Persistence gateway: typed load/save pairs over the key-value store
//! Reads fall back to typed defaults when a key is absent or its value is
//! corrupt; writes log failures and never propagate them. Storage is a
//! cache of last-known-good state, not a transaction log.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::content::FeedKind;
use crate::progress::{AnswerRecord, FeedStatistics};
use crate::settings::SettingsPayload;
use crate::storage::store::KeyValueStore;

/// Persisted record keys. Field names and nesting of the serialized shapes
/// are part of the durable contract; renaming any of them is a breaking
/// schema change.
mod keys {
    pub const QUIZ_PROGRESS: &str = "quiz-progress";
    pub const QUIZ_BOOKMARKS: &str = "quiz-bookmarks";
    pub const REEL_BOOKMARKS: &str = "reel-bookmarks";
    pub const REEL_LIKES: &str = "reel-likes";
    pub const REEL_MUTED: &str = "reel-muted";
    pub const FEED_PROGRESS: &str = "feed-progress";
    pub const SETTINGS: &str = "settings";

    pub const ALL: [&str; 7] = [
        QUIZ_PROGRESS,
        QUIZ_BOOKMARKS,
        REEL_BOOKMARKS,
        REEL_LIKES,
        REEL_MUTED,
        FEED_PROGRESS,
        SETTINGS,
    ];
}

/// Map of item id to answer record
pub type AnswerMap = HashMap<String, AnswerRecord>;
/// Map of item id to boolean flag (bookmark, like, mute)
pub type FlagMap = HashMap<String, bool>;

/// Statistics for both feeds under one key; either side may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedProgressRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quizzes: Option<FeedStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reels: Option<FeedStatistics>,
}

/// Typed persistence operations over the durable store
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.store.get(key).await {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    warn!("discarding corrupt persisted value for {}: {}", key, e);
                    fallback
                }
            },
            Ok(None) => fallback,
            Err(e) => {
                warn!("storage read failure for {}: {}", key, e);
                fallback
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to serialize {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.set(key, &text).await {
            warn!("storage write failure for {}: {}", key, e);
        }
    }

    pub async fn load_quiz_answers(&self) -> AnswerMap {
        self.read_json(keys::QUIZ_PROGRESS, AnswerMap::new()).await
    }

    pub async fn save_quiz_answers(&self, answers: &AnswerMap) {
        self.write_json(keys::QUIZ_PROGRESS, answers).await;
    }

    pub async fn load_quiz_bookmarks(&self) -> FlagMap {
        self.read_json(keys::QUIZ_BOOKMARKS, FlagMap::new()).await
    }

    pub async fn save_quiz_bookmarks(&self, bookmarks: &FlagMap) {
        self.write_json(keys::QUIZ_BOOKMARKS, bookmarks).await;
    }

    pub async fn load_reel_bookmarks(&self) -> FlagMap {
        self.read_json(keys::REEL_BOOKMARKS, FlagMap::new()).await
    }

    pub async fn save_reel_bookmarks(&self, bookmarks: &FlagMap) {
        self.write_json(keys::REEL_BOOKMARKS, bookmarks).await;
    }

    pub async fn load_reel_likes(&self) -> FlagMap {
        self.read_json(keys::REEL_LIKES, FlagMap::new()).await
    }

    pub async fn save_reel_likes(&self, likes: &FlagMap) {
        self.write_json(keys::REEL_LIKES, likes).await;
    }

    pub async fn load_reel_muted(&self) -> FlagMap {
        self.read_json(keys::REEL_MUTED, FlagMap::new()).await
    }

    pub async fn save_reel_muted(&self, muted: &FlagMap) {
        self.write_json(keys::REEL_MUTED, muted).await;
    }

    pub async fn load_feed_progress(&self) -> FeedProgressRecord {
        self.read_json(keys::FEED_PROGRESS, FeedProgressRecord::default())
            .await
    }

    pub async fn save_feed_progress(&self, progress: &FeedProgressRecord) {
        self.write_json(keys::FEED_PROGRESS, progress).await;
    }

    /// Statistics for one feed, defaulting when never persisted
    pub async fn load_feed_statistics(&self, kind: FeedKind) -> FeedStatistics {
        let record = self.load_feed_progress().await;
        match kind {
            FeedKind::Quiz => record.quizzes.unwrap_or_default(),
            FeedKind::Reel => record.reels.unwrap_or_default(),
        }
    }

    /// Read-modify-write of one feed's slot in the shared progress record
    pub async fn save_feed_statistics(&self, kind: FeedKind, stats: &FeedStatistics) {
        let mut record = self.load_feed_progress().await;
        match kind {
            FeedKind::Quiz => record.quizzes = Some(stats.clone()),
            FeedKind::Reel => record.reels = Some(stats.clone()),
        }
        self.save_feed_progress(&record).await;
    }

    pub async fn load_settings(&self) -> SettingsPayload {
        self.read_json(keys::SETTINGS, SettingsPayload::default())
            .await
    }

    pub async fn save_settings(&self, settings: &SettingsPayload) {
        self.write_json(keys::SETTINGS, settings).await;
    }

    /// Best-effort removal of every known key. Partial failure leaves some
    /// keys cleared; each container re-derives defaults on the next load.
    pub async fn reset(&self) {
        for key in keys::ALL {
            if let Err(e) = self.store.remove(key).await {
                warn!("failed to clear {} during reset: {}", key, e);
            }
        }
    }
}
