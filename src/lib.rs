//! Feedcore - Feed Progress & Persistence Engine
//! State containers for a two-feed (quiz / reels) content app: per-item
//! answers, likes, bookmarks and mute flags, rolling statistics, and
//! durable-storage reconciliation across app launches.

// Core modules
pub mod app;
pub mod content;
pub mod feed;
pub mod progress;
pub mod settings;
pub mod storage;

pub use app::App;
pub use content::{FeedKind, OptionLabel, QuizItem, ReelItem};
pub use feed::{QuizFeed, ReelFeed};
pub use progress::{AnswerRecord, FeedStatistics};
pub use settings::{Settings, SettingsPayload};
pub use storage::{KeyValueStore, PersistenceGateway};
