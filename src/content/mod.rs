//! Content catalog: item types and the asynchronous content source
//! The source owns the fetched-item cache and is the single source of
//! truth for what the catalog currently contains.

pub mod source;
pub mod types;

pub use source::{CachedSource, ItemLoader, ItemSource, StaticLoader};
pub use types::{
    Difficulty, FeedItem, FeedKind, OptionLabel, QuizItem, QuizOptions, ReelItem,
};
