//! Schedule Record - per-(learner, item) scheduling state
//!
//! Each record tracks one learner's progress on one content item:
//! - Current interval and ease factor
//! - Learning stage (coarse mastery bucket)
//! - Review history summary (counts and streak)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::DEFAULT_EASE;

// ============================================================================
// LEARNING STAGE
// ============================================================================

/// Coarse mastery bucket for a scheduled item.
///
/// Stages advance only on correct answers, gated by interval thresholds,
/// and regress to `Learning` on incorrect answers (unless still `New`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningStage {
    /// Never answered correctly; the item has just entered the scheduler
    #[default]
    New,
    /// Actively being learned, short intervals
    Learning,
    /// Consistently recalled, week-plus intervals
    Review,
    /// Long-term retention, month-plus intervals
    Graduated,
}

/// Interval (days) a correct answer must reach to move Learning → Review
pub const REVIEW_THRESHOLD_DAYS: u32 = 7;

/// Interval (days) a correct answer must reach to move Review → Graduated
pub const GRADUATION_THRESHOLD_DAYS: u32 = 30;

impl LearningStage {
    /// Apply the stage transition table for one answered review.
    ///
    /// `new_interval_days` is the interval produced by the calculator for
    /// this answer, not the interval the item arrived with.
    pub fn advance(self, was_correct: bool, new_interval_days: u32) -> Self {
        match (self, was_correct) {
            (LearningStage::New, true) => LearningStage::Learning,
            (LearningStage::Learning, true) if new_interval_days >= REVIEW_THRESHOLD_DAYS => {
                LearningStage::Review
            }
            (LearningStage::Review, true) if new_interval_days >= GRADUATION_THRESHOLD_DAYS => {
                LearningStage::Graduated
            }
            // Correct but below the threshold for the next stage
            (stage, true) => stage,
            // Incorrect: regress to Learning unless the item was never learned
            (LearningStage::New, false) => LearningStage::New,
            (_, false) => LearningStage::Learning,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStage::New => "new",
            LearningStage::Learning => "learning",
            LearningStage::Review => "review",
            LearningStage::Graduated => "graduated",
        }
    }

    /// Parse from string name
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "new" => LearningStage::New,
            "learning" => LearningStage::Learning,
            "review" => LearningStage::Review,
            "graduated" => LearningStage::Graduated,
            _ => LearningStage::New,
        }
    }
}

impl std::fmt::Display for LearningStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SCHEDULE RECORD
// ============================================================================

/// Persisted scheduling state for one (learner, item) pair.
///
/// Created the first time an item enters the scheduler for a learner,
/// mutated exactly once per answer submission, never deleted.
///
/// Invariants:
/// - `ease_factor` stays within the configured ease bounds
/// - `interval_days >= 1` once any correct review has occurred
/// - `next_review_at == last_reviewed_at + interval_days` whenever
///   `last_reviewed_at` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRecord {
    /// Learner this record belongs to
    pub learner_id: String,
    /// Content item being scheduled
    pub item_id: String,
    /// Days until the next review, 0 only before the first review
    pub interval_days: u32,
    /// Retention multiplier; higher means slower interval decay
    pub ease_factor: f64,
    /// When the item is next due
    pub next_review_at: DateTime<Utc>,
    /// When the item was last answered, absent before the first review
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Total answers submitted for this item
    pub review_count: u32,
    /// Total correct answers, for the historical success rate
    pub correct_count: u32,
    /// Current run of correct answers, reset by any lapse
    pub consecutive_correct: u32,
    /// Coarse mastery bucket
    pub learning_stage: LearningStage,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl ScheduleRecord {
    /// Create a fresh record for an item entering the scheduler.
    ///
    /// Starts at stage `New` with interval 0 and the default ease factor;
    /// `next_review_at` is `now` so the item is immediately due.
    pub fn new(learner_id: impl Into<String>, item_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            learner_id: learner_id.into(),
            item_id: item_id.into(),
            interval_days: 0,
            ease_factor: DEFAULT_EASE,
            next_review_at: now,
            last_reviewed_at: None,
            review_count: 0,
            correct_count: 0,
            consecutive_correct: 0,
            learning_stage: LearningStage::New,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fraction of past answers that were correct, 0.0 before any review.
    pub fn success_rate(&self) -> f64 {
        if self.review_count == 0 {
            0.0
        } else {
            f64::from(self.correct_count) / f64::from(self.review_count)
        }
    }

    /// Check if this item is due for review at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}

// ============================================================================
// TESTS
// ============================================================================
