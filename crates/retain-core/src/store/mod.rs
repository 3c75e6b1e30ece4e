//! Schedule Store
//!
//! Persistence contract for [`ScheduleRecord`]s, plus the bundled backends:
//! - In-memory store for tests and ephemeral deployments
//! - SQLite store (feature `sqlite-store`, on by default)
//!
//! Callers treat read failures as "no data" and fall back to heuristic
//! selection; write failures are recoverable ("progress not saved").

mod memory;

#[cfg(feature = "sqlite-store")]
mod migrations;
#[cfg(feature = "sqlite-store")]
mod sqlite;

pub use memory::MemoryScheduleStore;

#[cfg(feature = "sqlite-store")]
pub use migrations::MIGRATIONS;
#[cfg(feature = "sqlite-store")]
pub use sqlite::SqliteScheduleStore;

use chrono::{DateTime, Utc};

use crate::schedule::ScheduleRecord;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Store error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[cfg(feature = "sqlite-store")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
    /// Backend unavailable (lock poisoned, connection lost)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Store result type
pub type Result<T> = std::result::Result<T, StoreError>;

// ============================================================================
// SCHEDULE STORE CONTRACT
// ============================================================================

/// Persistence contract for per-(learner, item) schedule records.
///
/// Records are keyed independently by `(learner_id, item_id)`; no
/// cross-learner or cross-item coordination is required. Concurrent
/// upserts of the same key resolve last-write-wins.
pub trait ScheduleStore {
    /// Fetch the record for one (learner, item) pair, if any
    fn get(&self, learner_id: &str, item_id: &str) -> Result<Option<ScheduleRecord>>;

    /// List records due at `now`, ordered by `next_review_at` ascending
    /// (ties broken by `item_id` so sessions are deterministic), at most
    /// `limit` of them.
    fn list_due(&self, learner_id: &str, now: DateTime<Utc>, limit: usize)
        -> Result<Vec<ScheduleRecord>>;

    /// Insert or replace a record
    fn upsert(&self, record: &ScheduleRecord) -> Result<()>;

    /// Create and persist a fresh record (stage New, interval 0, default
    /// ease) for an item entering the scheduler.
    fn create_new(
        &self,
        learner_id: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ScheduleRecord>;
}
