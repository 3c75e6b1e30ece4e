//! Fallback Selection
//!
//! Heuristic session candidates for learners with no persisted schedule:
//! when the schedule store has nothing due (feature not yet provisioned, or
//! the backend is unavailable), candidates are synthesized from
//! lesson-completion recency and declared item difficulty.

mod selector;

pub use selector::{FallbackSelector, EXPLOIT_SHARE, RETENTION_WINDOW_DAYS};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Content-history collaborator error
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The backing content service failed
    #[error("Content backend error: {0}")]
    Backend(String),
    /// A lesson id the collaborator does not know
    #[error("Unknown lesson: {0}")]
    UnknownLesson(String),
}

/// Content-history result type
pub type Result<T> = std::result::Result<T, HistoryError>;

// ============================================================================
// CONTENT HISTORY CONTRACT
// ============================================================================

/// A content item as reported by the lesson backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonItem {
    /// Content item identifier
    pub item_id: String,
    /// Declared difficulty on the 1 (easy) to 5 (hard) scale
    pub difficulty: u8,
}

/// Lesson-completion collaborator consumed by the fallback selector.
///
/// Implemented by the surrounding application's content service; this core
/// only defines the contract.
pub trait ContentHistory {
    /// Lessons the learner has completed
    fn completed_lesson_ids(&self, learner_id: &str) -> Result<Vec<String>>;

    /// Content items belonging to one lesson
    fn items_for_lesson(&self, lesson_id: &str) -> Result<Vec<LessonItem>>;

    /// When the learner completed the lesson
    fn completion_date(&self, learner_id: &str, lesson_id: &str) -> Result<DateTime<Utc>>;
}
