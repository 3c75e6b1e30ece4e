//! Session Generator
//!
//! Orchestrates the schedule store, the fallback selector, and the interval
//! calculator: builds bounded review sessions and applies calculator
//! results back to the store after each answer.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ReviewItem, ReviewSession, SessionError, SessionPlan};
use crate::fallback::{ContentHistory, FallbackSelector};
use crate::schedule::ScheduleRecord;
use crate::srs::{ReviewInput, SchedulingCalculator};
use crate::store::ScheduleStore;

/// Session size when the caller does not ask for one
pub const DEFAULT_SESSION_LIMIT: usize = 10;

// ============================================================================
// RESPONSE OUTCOME
// ============================================================================

/// Result of recording one answer.
///
/// `persisted == false` is the recoverable "progress not saved" signal:
/// the computed record is still valid and returned, only the store write
/// failed. The session continues either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOutcome {
    /// The updated schedule record
    pub record: ScheduleRecord,
    /// Whether the record reached the store
    pub persisted: bool,
}

// ============================================================================
// SESSION GENERATOR
// ============================================================================

/// Builds review sessions and records answers for one schedule store and
/// one content-history collaborator.
///
/// Concurrent answers to the same (learner, item) within one session are
/// not expected; if they occur the store resolves them last-write-wins.
pub struct SessionGenerator<S, H> {
    store: S,
    history: H,
    selector: FallbackSelector,
    calculator: SchedulingCalculator,
}

impl<S, H> SessionGenerator<S, H>
where
    S: ScheduleStore,
    H: ContentHistory,
{
    /// Create a generator with default calculator coefficients
    pub fn new(store: S, history: H) -> Self {
        Self::with_calculator(store, history, SchedulingCalculator::default())
    }

    /// Create a generator with a custom-configured calculator
    pub fn with_calculator(store: S, history: H, calculator: SchedulingCalculator) -> Self {
        Self {
            store,
            history,
            selector: FallbackSelector::new(),
            calculator,
        }
    }

    /// The underlying schedule store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decide where session items come from: due records when the store
    /// has any, synthesized fallback candidates otherwise.
    ///
    /// A store read failure is treated identically to "nothing due" and
    /// routes to the fallback path.
    pub fn plan_session<R: Rng + ?Sized>(
        &self,
        learner_id: &str,
        limit: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> SessionPlan {
        let due = match self.store.list_due(learner_id, now, limit) {
            Ok(due) => due,
            Err(err) => {
                tracing::warn!(learner_id, error = %err, "schedule store read failed, using fallback selection");
                Vec::new()
            }
        };

        if !due.is_empty() {
            tracing::debug!(learner_id, count = due.len(), "session from due schedule records");
            SessionPlan::Scheduled(due.iter().map(ReviewItem::from_record).collect())
        } else {
            let items = self
                .selector
                .select(&self.history, learner_id, limit, now, rng);
            tracing::debug!(learner_id, count = items.len(), "session from fallback selection");
            SessionPlan::Fallback(items)
        }
    }

    /// Build a bounded review session for `learner_id`.
    pub fn build_session<R: Rng + ?Sized>(
        &self,
        learner_id: &str,
        limit: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> ReviewSession {
        let plan = self.plan_session(learner_id, limit, now, rng);
        ReviewSession::from_plan(learner_id, now, plan)
    }

    /// Build a session of [`DEFAULT_SESSION_LIMIT`] items using the wall
    /// clock and the thread-local RNG.
    pub fn build_session_now(&self, learner_id: &str) -> ReviewSession {
        self.build_session(learner_id, DEFAULT_SESSION_LIMIT, Utc::now(), &mut rand::rng())
    }

    /// Record one answer: load or create the record, run the calculator,
    /// advance the learning stage, and persist.
    ///
    /// Out-of-range difficulty fails loudly; store failures do not. A read
    /// failure falls back to a fresh record, and a write failure is
    /// reported through [`ResponseOutcome::persisted`].
    pub fn record_response(
        &self,
        learner_id: &str,
        item_id: &str,
        was_correct: bool,
        difficulty: u8,
        now: DateTime<Utc>,
    ) -> Result<ResponseOutcome, SessionError> {
        let record = self.load_or_create(learner_id, item_id, now);

        let outcome = self.calculator.compute_next(&ReviewInput {
            current_interval_days: record.interval_days,
            was_correct,
            difficulty,
            ease_factor: record.ease_factor,
            consecutive_correct: record.consecutive_correct,
            historical_success_rate: record.success_rate(),
            now,
        })?;

        let mut updated = record;
        updated.learning_stage = updated
            .learning_stage
            .advance(was_correct, outcome.interval_days);
        updated.interval_days = outcome.interval_days;
        updated.ease_factor = outcome.ease_factor;
        updated.next_review_at = outcome.next_review_at;
        updated.last_reviewed_at = Some(now);
        updated.review_count += 1;
        if was_correct {
            updated.correct_count += 1;
            updated.consecutive_correct += 1;
        } else {
            updated.consecutive_correct = 0;
        }
        updated.updated_at = now;

        let persisted = match self.store.upsert(&updated) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    learner_id,
                    item_id,
                    error = %err,
                    "schedule write failed, progress not saved"
                );
                false
            }
        };

        Ok(ResponseOutcome {
            record: updated,
            persisted,
        })
    }

    /// Fetch the record for the pair, creating one when absent. Store
    /// failures degrade to an unpersisted fresh record rather than aborting
    /// the answer.
    fn load_or_create(&self, learner_id: &str, item_id: &str, now: DateTime<Utc>) -> ScheduleRecord {
        match self.store.get(learner_id, item_id) {
            Ok(Some(record)) => record,
            Ok(None) => match self.store.create_new(learner_id, item_id, now) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(learner_id, item_id, error = %err, "create_new failed, using transient record");
                    ScheduleRecord::new(learner_id, item_id, now)
                }
            },
            Err(err) => {
                tracing::warn!(learner_id, item_id, error = %err, "schedule read failed, using transient record");
                ScheduleRecord::new(learner_id, item_id, now)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
