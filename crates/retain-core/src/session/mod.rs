//! Review Sessions
//!
//! Transient session assembly:
//! - [`ReviewItem`] / [`ReviewSession`] presented to the caller, never
//!   persisted (only the underlying [`ScheduleRecord`]s are)
//! - [`SessionPlan`] - the tagged store-vs-fallback decision
//! - [`SessionGenerator`] - orchestrates the store, the fallback selector,
//!   and the calculator
//!
//! [`ScheduleRecord`]: crate::schedule::ScheduleRecord

mod generator;

pub use generator::{ResponseOutcome, SessionGenerator, DEFAULT_SESSION_LIMIT};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::ScheduleRecord;
use crate::srs::{CalculatorError, MAX_EASE, MIN_EASE};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Session error type.
///
/// Only caller contract violations surface here; store and content-history
/// failures degrade per the documented fallback and "progress not saved"
/// paths instead of erroring.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Invalid calculator input (out-of-range difficulty or rate)
    #[error(transparent)]
    Calculator(#[from] CalculatorError),
}

// ============================================================================
// REVIEW ITEM
// ============================================================================

/// One item offered for review within a session. Transient: produced for
/// display and discarded with the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    /// Content item reference
    pub item_id: String,
    /// When the item is (or would be) due
    pub due_date: DateTime<Utc>,
    /// Difficulty on the 1 (easy) to 5 (hard) scale
    pub difficulty: u8,
    /// Current or synthesized interval in days
    pub interval_days: u32,
}

impl ReviewItem {
    /// Build a review item from a due schedule record.
    ///
    /// The record carries no declared difficulty, so the 1-5 value is
    /// derived from the ease factor: the lower the ease, the harder the
    /// item has proven to be.
    pub fn from_record(record: &ScheduleRecord) -> Self {
        Self {
            item_id: record.item_id.clone(),
            due_date: record.next_review_at,
            difficulty: difficulty_from_ease(record.ease_factor),
            interval_days: record.interval_days,
        }
    }
}

/// Map an ease factor onto the 1-5 difficulty scale (inverse relationship).
pub(crate) fn difficulty_from_ease(ease_factor: f64) -> u8 {
    let span = MAX_EASE - MIN_EASE;
    let normalized = ((ease_factor - MIN_EASE) / span).clamp(0.0, 1.0);
    // normalized 1.0 (max ease) -> difficulty 1, normalized 0.0 -> 5
    5 - (normalized * 4.0).round() as u8
}

// ============================================================================
// SESSION PLAN
// ============================================================================

/// Where a session's items came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOrigin {
    /// Items taken from due schedule records
    Scheduled,
    /// Items synthesized from lesson-completion history
    Fallback,
}

/// The two-path session decision: either the store had due records, or the
/// fallback selector synthesized candidates. A session never mixes the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "origin", content = "items")]
pub enum SessionPlan {
    /// Due records were found in the schedule store
    Scheduled(Vec<ReviewItem>),
    /// Nothing due (or store unavailable); heuristic candidates instead
    Fallback(Vec<ReviewItem>),
}

impl SessionPlan {
    /// The planned items, regardless of origin
    pub fn items(&self) -> &[ReviewItem] {
        match self {
            SessionPlan::Scheduled(items) | SessionPlan::Fallback(items) => items,
        }
    }

    /// Which path produced the plan
    pub fn origin(&self) -> SessionOrigin {
        match self {
            SessionPlan::Scheduled(_) => SessionOrigin::Scheduled,
            SessionPlan::Fallback(_) => SessionOrigin::Fallback,
        }
    }

    /// Consume the plan, yielding its items
    pub fn into_items(self) -> Vec<ReviewItem> {
        match self {
            SessionPlan::Scheduled(items) | SessionPlan::Fallback(items) => items,
        }
    }
}

// ============================================================================
// REVIEW SESSION
// ============================================================================

/// An ordered batch of review items for one learner. Recreated per request,
/// never persisted; abandoning a session simply leaves its unanswered items
/// unscheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    /// Session identifier (UUID v4)
    pub id: Uuid,
    /// Learner the session belongs to
    pub learner_id: String,
    /// When the session was assembled
    pub created_at: DateTime<Utc>,
    /// Which path produced the items
    pub origin: SessionOrigin,
    /// Items in presentation order
    pub items: Vec<ReviewItem>,
}

impl ReviewSession {
    /// Assemble a session from a plan
    pub fn from_plan(learner_id: impl Into<String>, created_at: DateTime<Utc>, plan: SessionPlan) -> Self {
        let origin = plan.origin();
        Self {
            id: Uuid::new_v4(),
            learner_id: learner_id.into(),
            created_at,
            origin,
            items: plan.into_items(),
        }
    }

    /// Number of items in the session
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the session has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srs::DEFAULT_EASE;

    #[test]
    fn test_difficulty_from_ease_inverse_scale() {
        assert_eq!(difficulty_from_ease(MAX_EASE), 1);
        assert_eq!(difficulty_from_ease(MIN_EASE), 5);
        assert_eq!(difficulty_from_ease(DEFAULT_EASE), 2);
        // Out-of-band values clamp to the scale
        assert_eq!(difficulty_from_ease(10.0), 1);
        assert_eq!(difficulty_from_ease(0.5), 5);
    }

    #[test]
    fn test_plan_accessors() {
        let item = ReviewItem {
            item_id: "item-1".to_string(),
            due_date: Utc::now(),
            difficulty: 3,
            interval_days: 2,
        };
        let scheduled = SessionPlan::Scheduled(vec![item.clone()]);
        assert_eq!(scheduled.origin(), SessionOrigin::Scheduled);
        assert_eq!(scheduled.items().len(), 1);

        let fallback = SessionPlan::Fallback(vec![item]);
        assert_eq!(fallback.origin(), SessionOrigin::Fallback);
        assert_eq!(fallback.into_items().len(), 1);
    }

    #[test]
    fn test_session_from_plan_keeps_origin_and_order() {
        let now = Utc::now();
        let items: Vec<ReviewItem> = (0..3)
            .map(|i| ReviewItem {
                item_id: format!("item-{i}"),
                due_date: now,
                difficulty: 3,
                interval_days: 1,
            })
            .collect();
        let session =
            ReviewSession::from_plan("learner-1", now, SessionPlan::Fallback(items.clone()));
        assert_eq!(session.origin, SessionOrigin::Fallback);
        assert_eq!(session.items, items);
        assert_eq!(session.len(), 3);
        assert!(!session.is_empty());
    }
}
