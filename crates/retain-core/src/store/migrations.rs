//! Database Migrations
//!
//! Schema migration definitions for the SQLite schedule store.

use rusqlite::Connection;

use super::Result;

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "Initial schedule_records schema",
    up: MIGRATION_V1_UP,
}];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS schedule_records (
    learner_id TEXT NOT NULL,
    item_id TEXT NOT NULL,

    -- Scheduling state
    interval_days INTEGER NOT NULL DEFAULT 0,
    ease_factor REAL NOT NULL DEFAULT 2.5,
    next_review_at TEXT NOT NULL,
    last_reviewed_at TEXT,
    learning_stage TEXT NOT NULL DEFAULT 'new',

    -- Review history summary
    review_count INTEGER NOT NULL DEFAULT 0,
    correct_count INTEGER NOT NULL DEFAULT 0,
    consecutive_correct INTEGER NOT NULL DEFAULT 0,

    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    PRIMARY KEY (learner_id, item_id)
);

CREATE INDEX IF NOT EXISTS idx_schedule_next_review
    ON schedule_records(learner_id, next_review_at);
CREATE INDEX IF NOT EXISTS idx_schedule_stage
    ON schedule_records(learner_id, learning_stage);
"#;

/// Apply any migrations newer than the connection's `user_version`.
pub fn apply_migrations(conn: &Connection) -> Result<()> {
    let current: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for migration in MIGRATIONS {
        if migration.version > current {
            tracing::debug!(
                version = migration.version,
                description = migration.description,
                "applying schedule store migration"
            );
            conn.execute_batch(migration.up)?;
            conn.pragma_update(None, "user_version", migration.version)?;
        }
    }

    Ok(())
}
