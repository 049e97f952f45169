//! Shared feed state machine, generic over item kind
//! Idle -> Loading -> Ready, with Error reachable from Loading; Ready and
//! Error re-enter Loading via refresh. The current index is clamped into
//! `[0, items.len() - 1]` and never reads out of bounds, even transiently.

use tracing::debug;

use crate::content::{FeedItem, FeedKind};
use crate::progress::FeedStatistics;

/// Coarse load state derived from the container fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Session-owned feed state shared by both containers.
/// `items`, `loading` and `error` are never persisted; `stats` is mirrored
/// to storage by the owning container.
pub(crate) struct FeedCore<T> {
    kind: FeedKind,
    pub(crate) items: Vec<T>,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) current_index: usize,
    pub(crate) stats: FeedStatistics,
    generation: u64,
}

impl<T: FeedItem> FeedCore<T> {
    pub(crate) fn new(kind: FeedKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            loading: false,
            error: None,
            current_index: 0,
            stats: FeedStatistics::default(),
            generation: 0,
        }
    }

    pub(crate) fn phase(&self) -> FeedPhase {
        if self.loading {
            FeedPhase::Loading
        } else if self.error.is_some() {
            FeedPhase::Error
        } else if self.items.is_empty() {
            FeedPhase::Idle
        } else {
            FeedPhase::Ready
        }
    }

    /// Enter Loading and return the generation token for this request.
    /// A completion only applies while its token is still the latest issued.
    pub(crate) fn begin_load(&mut self, clear_error: bool) -> u64 {
        self.generation += 1;
        self.loading = true;
        if clear_error {
            self.error = None;
        }
        self.generation
    }

    /// Apply a successful load. `rebase_index` re-derives the cursor from
    /// the persisted high-water mark (fetch); otherwise the live cursor is
    /// only clamped into the new bounds (refresh).
    pub(crate) fn apply_items(&mut self, generation: u64, items: Vec<T>, rebase_index: bool) -> bool {
        if generation != self.generation {
            debug!("{} feed: dropping stale load (gen {})", self.kind, generation);
            return false;
        }
        let bound = items.len().saturating_sub(1);
        self.items = items;
        self.loading = false;
        self.error = None;
        self.current_index = if rebase_index {
            self.stats.last_seen_index.min(bound)
        } else {
            self.current_index.min(bound)
        };
        true
    }

    /// Apply a failed load, keeping any previously loaded items
    pub(crate) fn apply_error(&mut self, generation: u64, message: String) -> bool {
        if generation != self.generation {
            debug!("{} feed: dropping stale error (gen {})", self.kind, generation);
            return false;
        }
        self.loading = false;
        self.error = Some(message);
        true
    }

    /// Clamp and move the cursor. Returns false (and changes nothing) when
    /// the clamped value already equals the current index, so redundant
    /// scroll ticks never trigger a persistence write.
    pub(crate) fn set_current_index(&mut self, index: usize) -> bool {
        let bounded = index.min(self.items.len().saturating_sub(1));
        if bounded == self.current_index {
            return false;
        }
        self.current_index = bounded;
        self.stats.last_seen_index = self.stats.last_seen_index.max(bounded);
        true
    }

    pub(crate) fn item_by_id(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }
}
