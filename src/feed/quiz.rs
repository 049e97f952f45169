//! Quiz feed container: answers, bookmarks, and answer-driven statistics

use std::sync::Arc;

use chrono::Utc;

use crate::content::{FeedKind, ItemSource, OptionLabel, QuizItem};
use crate::feed::state::{FeedCore, FeedPhase};
use crate::progress::{self, AnswerRecord, FeedStatistics};
use crate::storage::gateway::{AnswerMap, FlagMap};
use crate::storage::PersistenceGateway;

/// Persisted-owned slice of quiz feed state, as restored at startup.
/// Field ownership: `answers`, `bookmarks` and `stats` belong to storage;
/// `items`, `loading`, `error` and the live cursor belong to the session
/// and always win during the rehydration merge.
pub(crate) struct QuizSnapshot {
    pub answers: AnswerMap,
    pub bookmarks: FlagMap,
    pub stats: FeedStatistics,
}

/// In-memory authoritative state for the quiz feed
pub struct QuizFeed {
    core: FeedCore<QuizItem>,
    answers: AnswerMap,
    bookmarks: FlagMap,
    source: Arc<dyn ItemSource<QuizItem>>,
    gateway: Arc<PersistenceGateway>,
}

impl QuizFeed {
    /// Construct the container and restore persisted progress before it is
    /// exposed to any caller
    pub async fn hydrate(
        gateway: Arc<PersistenceGateway>,
        source: Arc<dyn ItemSource<QuizItem>>,
    ) -> Self {
        let snapshot = QuizSnapshot {
            answers: gateway.load_quiz_answers().await,
            bookmarks: gateway.load_quiz_bookmarks().await,
            stats: gateway.load_feed_statistics(FeedKind::Quiz).await,
        };
        let mut feed = Self {
            core: FeedCore::new(FeedKind::Quiz),
            answers: AnswerMap::new(),
            bookmarks: FlagMap::new(),
            source,
            gateway,
        };
        feed.merge_persisted(snapshot);
        feed
    }

    /// Merge a persisted snapshot over freshly-initialized state. Only
    /// persisted-owned fields are touched; session-owned fields are left
    /// exactly as constructed.
    pub(crate) fn merge_persisted(&mut self, snapshot: QuizSnapshot) {
        self.answers = snapshot.answers;
        self.bookmarks = snapshot.bookmarks;
        self.core.stats = snapshot.stats;
    }

    pub fn items(&self) -> &[QuizItem] {
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

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn answer_for(&self, item_id: &str) -> Option<&AnswerRecord> {
        self.answers.get(item_id)
    }

    pub fn bookmarks(&self) -> &FlagMap {
        &self.bookmarks
    }

    pub fn is_bookmarked(&self, item_id: &str) -> bool {
        self.bookmarks.contains_key(item_id)
    }

    /// Cache-first load. On success the cursor is rebased onto the persisted
    /// high-water mark; on failure previously loaded items stay in place.
    pub async fn fetch(&mut self) {
        let generation = self.core.begin_load(true);
        match self.source.get_items().await {
            Ok(items) => {
                self.core.apply_items(generation, items, true);
            }
            Err(e) => {
                self.core
                    .apply_error(generation, format!("Failed to load quizzes: {}", e));
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
                    .apply_error(generation, format!("Failed to refresh quizzes: {}", e));
            }
        }
    }

    /// Move the cursor, clamped to the item bounds. A redundant call is an
    /// exact no-op with no persistence write.
    pub async fn set_current_index(&mut self, index: usize) {
        if self.core.set_current_index(index) {
            self.persist_stats().await;
        }
    }

    /// Answer one quiz item. Idempotent per item: a second call returns the
    /// first record unchanged and leaves statistics untouched. Returns None
    /// when the item is not in the catalog.
    pub async fn select_option(
        &mut self,
        item_id: &str,
        option: OptionLabel,
        elapsed_ms: u64,
    ) -> Option<AnswerRecord> {
        if let Some(existing) = self.answers.get(item_id) {
            return Some(existing.clone());
        }
        let item = self.core.item_by_id(item_id)?.clone();
        let record = progress::record_answer(
            &item,
            option,
            elapsed_ms,
            Utc::now().timestamp_millis(),
        );
        self.core.stats = progress::advance_statistics(
            &self.core.stats,
            record.is_correct,
            elapsed_ms,
            self.core.current_index,
        );
        self.answers.insert(item_id.to_string(), record.clone());

        self.gateway.save_quiz_answers(&self.answers).await;
        self.persist_stats().await;
        Some(record)
    }

    /// Flip the bookmark flag; unset bookmarks are removed from the map
    /// rather than stored as false
    pub async fn toggle_bookmark(&mut self, item_id: &str) {
        if self.bookmarks.remove(item_id).is_none() {
            self.bookmarks.insert(item_id.to_string(), true);
        }
        self.gateway.save_quiz_bookmarks(&self.bookmarks).await;
    }

    /// Clear answers, bookmarks, and statistics; fetched items are kept
    pub async fn reset_progress(&mut self) {
        self.answers.clear();
        self.bookmarks.clear();
        self.core.stats = FeedStatistics::default();
        self.gateway.save_quiz_answers(&self.answers).await;
        self.gateway.save_quiz_bookmarks(&self.bookmarks).await;
        self.persist_stats().await;
    }

    async fn persist_stats(&self) {
        self.gateway
            .save_feed_statistics(FeedKind::Quiz, &self.core.stats)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::content::{CachedSource, Difficulty, ItemLoader, QuizOptions, StaticLoader};
    use crate::storage::MemoryStore;

    fn quiz(id: &str, correct: OptionLabel) -> QuizItem {
        QuizItem {
            id: id.to_string(),
            category: "general".to_string(),
            difficulty: Difficulty::Easy,
            question: format!("Question {}?", id),
            options: QuizOptions {
                a: "A".to_string(),
                b: "B".to_string(),
                c: "C".to_string(),
                d: "D".to_string(),
            },
            correct,
            explanation: None,
        }
    }

    fn catalog() -> Vec<QuizItem> {
        vec![
            quiz("q1", OptionLabel::B),
            quiz("q2", OptionLabel::A),
            quiz("q3", OptionLabel::D),
        ]
    }

    fn gateway() -> Arc<PersistenceGateway> {
        Arc::new(PersistenceGateway::new(Arc::new(MemoryStore::new())))
    }

    fn source_of(items: Vec<QuizItem>) -> Arc<dyn ItemSource<QuizItem>> {
        Arc::new(CachedSource::new(Arc::new(StaticLoader::new(items))))
    }

    async fn ready_feed() -> QuizFeed {
        let mut feed = QuizFeed::hydrate(gateway(), source_of(catalog())).await;
        feed.fetch().await;
        feed
    }

    struct FailingLoader;

    #[async_trait]
    impl ItemLoader<QuizItem> for FailingLoader {
        async fn load(&self) -> anyhow::Result<Vec<QuizItem>> {
            Err(anyhow!("network unreachable"))
        }
    }

    /// Loader whose payload can be swapped between calls
    struct SwappableLoader {
        batches: Mutex<Vec<Vec<QuizItem>>>,
    }

    #[async_trait]
    impl ItemLoader<QuizItem> for SwappableLoader {
        async fn load(&self) -> anyhow::Result<Vec<QuizItem>> {
            let mut batches = self.batches.lock().unwrap();
            if batches.len() > 1 {
                Ok(batches.remove(0))
            } else {
                Ok(batches[0].clone())
            }
        }
    }

    #[tokio::test]
    async fn fetch_transitions_to_ready() {
        let feed = ready_feed().await;
        assert_eq!(feed.phase(), FeedPhase::Ready);
        assert_eq!(feed.items().len(), 3);
        assert!(!feed.loading());
        assert!(feed.error().is_none());
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_error_and_keeps_items() {
        let mut feed = ready_feed().await;

        feed.source = Arc::new(CachedSource::new(Arc::new(FailingLoader)));
        feed.fetch().await;

        assert_eq!(feed.phase(), FeedPhase::Error);
        assert!(feed.error().unwrap().contains("network unreachable"));
        assert_eq!(feed.items().len(), 3);
    }

    #[tokio::test]
    async fn select_option_records_answer_and_stats() {
        let mut feed = ready_feed().await;
        feed.set_current_index(1).await;

        let record = feed
            .select_option("q2", OptionLabel::A, 1200)
            .await
            .unwrap();
        assert!(record.is_correct);
        assert_eq!(feed.stats().answered, 1);
        assert_eq!(feed.stats().correct, 1);
        assert_eq!(feed.stats().streak, 1);
        assert_eq!(feed.stats().total_time_ms, 1200);
        assert_eq!(feed.stats().last_seen_index, 1);
    }

    #[tokio::test]
    async fn select_option_is_idempotent() {
        let mut feed = ready_feed().await;

        let first = feed
            .select_option("q1", OptionLabel::B, 1000)
            .await
            .unwrap();
        let stats_after_first = feed.stats().clone();

        // different option and elapsed time; still returns the first record
        let second = feed
            .select_option("q1", OptionLabel::C, 9999)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(feed.stats(), &stats_after_first);
    }

    #[tokio::test]
    async fn select_option_on_unknown_item_returns_none() {
        let mut feed = ready_feed().await;
        assert!(feed
            .select_option("nope", OptionLabel::A, 100)
            .await
            .is_none());
        assert_eq!(feed.stats().answered, 0);
    }

    #[tokio::test]
    async fn bookmark_toggle_round_trips_map_shape() {
        let mut feed = ready_feed().await;
        assert!(feed.bookmarks().is_empty());

        feed.toggle_bookmark("q1").await;
        assert!(feed.is_bookmarked("q1"));
        assert_eq!(feed.bookmarks().len(), 1);

        feed.toggle_bookmark("q1").await;
        assert!(!feed.is_bookmarked("q1"));
        // no stray falsy-valued key left behind
        assert!(feed.bookmarks().is_empty());
    }

    #[tokio::test]
    async fn progress_survives_rehydration() {
        let gateway = gateway();
        let mut feed = QuizFeed::hydrate(gateway.clone(), source_of(catalog())).await;
        feed.fetch().await;
        feed.set_current_index(2).await;
        feed.select_option("q3", OptionLabel::D, 800).await.unwrap();
        feed.toggle_bookmark("q1").await;

        let restored = QuizFeed::hydrate(gateway, source_of(catalog())).await;
        assert_eq!(restored.answers().len(), 1);
        assert!(restored.is_bookmarked("q1"));
        assert_eq!(restored.stats().answered, 1);
        assert_eq!(restored.stats().last_seen_index, 2);
    }

    #[tokio::test]
    async fn fetch_rebases_cursor_onto_persisted_high_water_mark() {
        let gateway = gateway();
        let mut feed = QuizFeed::hydrate(gateway.clone(), source_of(catalog())).await;
        feed.fetch().await;
        feed.set_current_index(2).await;

        let mut restored = QuizFeed::hydrate(gateway, source_of(catalog())).await;
        assert_eq!(restored.current_index(), 0);
        restored.fetch().await;
        assert_eq!(restored.current_index(), 2);
    }

    #[tokio::test]
    async fn rehydration_merge_never_touches_session_fields() {
        let mut feed = ready_feed().await;
        let items_before = feed.items().to_vec();
        feed.set_current_index(1).await;

        let mut answers = AnswerMap::new();
        answers.insert(
            "q9".to_string(),
            AnswerRecord {
                item_id: "q9".to_string(),
                selected_label: OptionLabel::A,
                is_correct: true,
                elapsed_ms: 1,
                answered_at: 1,
            },
        );
        feed.merge_persisted(QuizSnapshot {
            answers,
            bookmarks: FlagMap::new(),
            stats: FeedStatistics::default(),
        });

        assert_eq!(feed.items(), items_before.as_slice());
        assert!(!feed.loading());
        assert!(feed.error().is_none());
        assert_eq!(feed.current_index(), 1);
        assert_eq!(feed.answers().len(), 1);
    }

    #[tokio::test]
    async fn refresh_keeps_cursor_and_clamps_on_shrink() {
        let loader = Arc::new(SwappableLoader {
            batches: Mutex::new(vec![catalog(), vec![quiz("q1", OptionLabel::B)]]),
        });
        let source = Arc::new(CachedSource::new(loader));
        let mut feed = QuizFeed::hydrate(gateway(), source).await;

        feed.fetch().await;
        feed.set_current_index(2).await;

        feed.refresh().await;
        assert_eq!(feed.items().len(), 1);
        assert_eq!(feed.current_index(), 0);
        // high-water mark is untouched by the shrink
        assert_eq!(feed.stats().last_seen_index, 2);
    }

    #[tokio::test]
    async fn reset_progress_clears_maps_but_keeps_items() {
        let mut feed = ready_feed().await;
        feed.select_option("q1", OptionLabel::B, 500).await.unwrap();
        feed.toggle_bookmark("q2").await;

        feed.reset_progress().await;
        assert!(feed.answers().is_empty());
        assert!(feed.bookmarks().is_empty());
        assert_eq!(feed.stats(), &FeedStatistics::default());
        assert_eq!(feed.items().len(), 3);
    }
}
