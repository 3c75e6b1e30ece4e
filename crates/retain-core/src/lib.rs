//! # Retain Core
//!
//! Spaced-repetition review scheduling for vocabulary and content items:
//!
//! - **Interval calculator**: SM-2-lineage ease-factor scheduling with
//!   natural decay, lapse forgiveness, and logarithmically damped growth
//! - **Learning stages**: New → Learning → Review → Graduated, driven by an
//!   explicit transition table
//! - **Schedule store**: per-(learner, item) persistence contract with
//!   bundled in-memory and SQLite backends
//! - **Fallback selection**: heuristic session candidates from
//!   lesson-completion recency when no schedule exists yet
//! - **Session generation**: bounded review sessions that never mix
//!   store-backed and fallback items
//!
//! The calculator is pure and clock-free; the only I/O boundary is the
//! schedule store. Store reads that fail degrade to the fallback path, and
//! store writes that fail surface as a recoverable "progress not saved"
//! signal rather than an error.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use retain_core::{MemoryScheduleStore, SessionGenerator};
//! # use retain_core::{ContentHistory, LessonItem};
//! # struct NoHistory;
//! # impl ContentHistory for NoHistory {
//! #     fn completed_lesson_ids(&self, _: &str) -> retain_core::fallback::Result<Vec<String>> { Ok(vec![]) }
//! #     fn items_for_lesson(&self, _: &str) -> retain_core::fallback::Result<Vec<LessonItem>> { Ok(vec![]) }
//! #     fn completion_date(&self, _: &str, _: &str) -> retain_core::fallback::Result<chrono::DateTime<Utc>> {
//! #         Err(retain_core::HistoryError::Backend("none".into()))
//! #     }
//! # }
//!
//! let generator = SessionGenerator::new(MemoryScheduleStore::new(), NoHistory);
//!
//! // Record an answer; a schedule record is created on first contact
//! let outcome = generator.record_response("learner-1", "item-1", true, 2, Utc::now())?;
//! assert_eq!(outcome.record.interval_days, 1);
//!
//! // Build a bounded session (due items, or fallback candidates)
//! let session = generator.build_session_now("learner-1");
//! assert!(session.len() <= retain_core::DEFAULT_SESSION_LIMIT);
//! # Ok::<(), retain_core::SessionError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): SQLite schedule store with the bundled
//!   C library
//! - `sqlite-store`: SQLite schedule store linked against system SQLite

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod fallback;
pub mod schedule;
pub mod session;
pub mod srs;
pub mod store;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Interval calculator
pub use srs::{
    CalculatorError, ReviewInput, ReviewOutcome, SchedulerConfig, SchedulingCalculator,
    DEFAULT_EASE, MAX_EASE, MIN_EASE,
};

// Schedule records
pub use schedule::{LearningStage, ScheduleRecord};

// Store contract and backends
pub use store::{MemoryScheduleStore, ScheduleStore, StoreError};

#[cfg(feature = "sqlite-store")]
pub use store::SqliteScheduleStore;

// Fallback selection
pub use fallback::{ContentHistory, FallbackSelector, HistoryError, LessonItem};

// Session assembly
pub use session::{
    ResponseOutcome, ReviewItem, ReviewSession, SessionError, SessionGenerator, SessionOrigin,
    SessionPlan, DEFAULT_SESSION_LIMIT,
};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        ContentHistory, LearningStage, LessonItem, MemoryScheduleStore, ResponseOutcome,
        ReviewItem, ReviewSession, ScheduleRecord, ScheduleStore, SchedulerConfig,
        SchedulingCalculator, SessionGenerator, SessionOrigin, SessionPlan,
    };

    #[cfg(feature = "sqlite-store")]
    pub use crate::SqliteScheduleStore;
}
