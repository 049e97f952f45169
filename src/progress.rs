//! Progress calculator: pure functions over answers and rolling statistics
//! No state, no I/O; everything is a total function of its inputs.

use serde::{Deserialize, Serialize};

use crate::content::{OptionLabel, QuizItem};

/// The outcome of answering one quiz item, created at most once per item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub item_id: String,
    pub selected_label: OptionLabel,
    pub is_correct: bool,
    pub elapsed_ms: u64,
    /// Unix epoch milliseconds
    pub answered_at: i64,
}

/// Rolling per-feed statistics
/// `last_seen_index` is a high-water mark, not the live cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatistics {
    pub answered: u32,
    pub correct: u32,
    pub streak: u32,
    pub total_time_ms: u64,
    pub last_seen_index: usize,
}

impl FeedStatistics {
    /// Fraction of answered items that were correct, 0.0 when nothing answered
    pub fn accuracy(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.answered)
        }
    }
}

/// Build the answer record for one quiz item.
/// Deterministic given `answered_at`; correctness is a straight label match.
pub fn record_answer(
    item: &QuizItem,
    selected: OptionLabel,
    elapsed_ms: u64,
    answered_at: i64,
) -> AnswerRecord {
    AnswerRecord {
        item_id: item.id.clone(),
        selected_label: selected,
        is_correct: item.correct == selected,
        elapsed_ms,
        answered_at,
    }
}

/// Fold one answer into the running statistics.
/// Streak resets to zero on an incorrect answer; `last_seen_index` only
/// ever moves forward.
pub fn advance_statistics(
    previous: &FeedStatistics,
    is_correct: bool,
    elapsed_ms: u64,
    viewed_index: usize,
) -> FeedStatistics {
    FeedStatistics {
        answered: previous.answered + 1,
        correct: previous.correct + u32::from(is_correct),
        streak: if is_correct { previous.streak + 1 } else { 0 },
        total_time_ms: previous.total_time_ms + elapsed_ms,
        last_seen_index: previous.last_seen_index.max(viewed_index),
    }
}
