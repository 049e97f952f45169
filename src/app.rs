//! Application context: explicitly constructed container instances
//! One instance per feed, owned here and passed by reference to consumers.
//! No global mutable state.

use std::sync::Arc;

use tracing::info;

use crate::content::{ItemSource, QuizItem, ReelItem};
use crate::feed::{QuizFeed, ReelFeed};
use crate::settings::Settings;
use crate::storage::{KeyValueStore, PersistenceGateway};

/// Top-level engine state: both feeds plus settings, all rehydrated
pub struct App {
    pub quiz: QuizFeed,
    pub reels: ReelFeed,
    pub settings: Settings,
    gateway: Arc<PersistenceGateway>,
}

impl App {
    /// Build every container from the given store and sources. Rehydration
    /// completes here, before any caller can observe the containers.
    pub async fn init(
        store: Arc<dyn KeyValueStore>,
        quiz_source: Arc<dyn ItemSource<QuizItem>>,
        reel_source: Arc<dyn ItemSource<ReelItem>>,
    ) -> Self {
        let gateway = Arc::new(PersistenceGateway::new(store));
        let quiz = QuizFeed::hydrate(gateway.clone(), quiz_source).await;
        let reels = ReelFeed::hydrate(gateway.clone(), reel_source).await;
        let settings = Settings::hydrate(gateway.clone()).await;
        info!(
            "engine ready: {} quiz answers, {} reel likes restored",
            quiz.answers().len(),
            reels.likes().len()
        );
        Self {
            quiz,
            reels,
            settings,
            gateway,
        }
    }

    /// Full preference reset: every container back to defaults and every
    /// persisted key removed
    pub async fn reset_all(&mut self) {
        self.quiz.reset_progress().await;
        self.reels.reset_progress().await;
        self.settings.reset().await;
        self.gateway.reset().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CachedSource, OptionLabel, StaticLoader};
    use crate::storage::MemoryStore;

    fn quiz_source() -> Arc<dyn ItemSource<QuizItem>> {
        let loader = StaticLoader::bundled_quizzes().unwrap();
        Arc::new(CachedSource::new(Arc::new(loader)))
    }

    fn reel_source() -> Arc<dyn ItemSource<ReelItem>> {
        let loader = StaticLoader::bundled_reels().unwrap();
        Arc::new(CachedSource::new(Arc::new(loader)))
    }

    #[tokio::test]
    async fn feeds_are_independent() {
        let store = Arc::new(MemoryStore::new());
        let mut app = App::init(store, quiz_source(), reel_source()).await;
        app.quiz.fetch().await;
        app.reels.fetch().await;

        let first_quiz = app.quiz.items()[0].clone();
        app.quiz
            .select_option(&first_quiz.id, first_quiz.correct, 700)
            .await
            .unwrap();

        assert_eq!(app.quiz.stats().answered, 1);
        assert_eq!(app.reels.stats().answered, 0);
    }

    #[tokio::test]
    async fn reset_all_wipes_progress_and_settings() {
        let store = Arc::new(MemoryStore::new());
        let mut app = App::init(store.clone(), quiz_source(), reel_source()).await;
        app.quiz.fetch().await;

        let first_quiz = app.quiz.items()[0].clone();
        app.quiz
            .select_option(&first_quiz.id, OptionLabel::A, 300)
            .await
            .unwrap();
        app.settings.set_sound_enabled(false).await;

        app.reset_all().await;
        assert!(app.quiz.answers().is_empty());
        assert!(app.settings.sound_enabled());

        let restored = App::init(store, quiz_source(), reel_source()).await;
        assert!(restored.quiz.answers().is_empty());
        assert_eq!(restored.quiz.stats().answered, 0);
        assert!(restored.settings.sound_enabled());
    }
}
