//! SQLite Schedule Store
//!
//! Reference persistence backend for schedule records. One record per
//! (learner, item) pair, upserted in place; timestamps stored as RFC 3339
//! text.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Result, ScheduleStore, StoreError};
use crate::schedule::{LearningStage, ScheduleRecord};

/// SQLite-backed schedule store.
///
/// All methods take `&self`; the connection lives behind a `Mutex` so the
/// store is `Send + Sync` and callers can share it with an `Arc`.
pub struct SqliteScheduleStore {
    conn: Mutex<Connection>,
}

impl SqliteScheduleStore {
    /// Apply performance PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open (or create) a store at `db_path`, falling back to the
    /// platform data directory when no path is given.
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("app", "retain", "core").ok_or_else(|| {
                    StoreError::Init("Could not determine project directories".to_string())
                })?;
                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                data_dir.join("retain.db")
            }
        };

        let conn = Connection::open(&path)?;
        Self::configure_connection(&conn)?;
        super::migrations::apply_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure_connection(&conn)?;
        super::migrations::apply_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ScheduleRecord> {
        Ok(ScheduleRecord {
            learner_id: row.get("learner_id")?,
            item_id: row.get("item_id")?,
            interval_days: row.get("interval_days")?,
            ease_factor: row.get("ease_factor")?,
            next_review_at: row.get("next_review_at")?,
            last_reviewed_at: row.get("last_reviewed_at")?,
            review_count: row.get("review_count")?,
            correct_count: row.get("correct_count")?,
            consecutive_correct: row.get("consecutive_correct")?,
            learning_stage: LearningStage::parse_name(&row.get::<_, String>("learning_stage")?),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

const SELECT_COLUMNS: &str = "learner_id, item_id, interval_days, ease_factor, \
     next_review_at, last_reviewed_at, learning_stage, \
     review_count, correct_count, consecutive_correct, created_at, updated_at";

impl ScheduleStore for SqliteScheduleStore {
    fn get(&self, learner_id: &str, item_id: &str) -> Result<Option<ScheduleRecord>> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM schedule_records
                     WHERE learner_id = ?1 AND item_id = ?2"
                ),
                params![learner_id, item_id],
                Self::record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn list_due(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ScheduleRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM schedule_records
             WHERE learner_id = ?1 AND next_review_at <= ?2
             ORDER BY next_review_at ASC, item_id ASC
             LIMIT ?3"
        ))?;
        let records = stmt
            .query_map(
                params![learner_id, now, limit as i64],
                Self::record_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn upsert(&self, record: &ScheduleRecord) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO schedule_records (
                learner_id, item_id, interval_days, ease_factor,
                next_review_at, last_reviewed_at, learning_stage,
                review_count, correct_count, consecutive_correct,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(learner_id, item_id) DO UPDATE SET
                interval_days = excluded.interval_days,
                ease_factor = excluded.ease_factor,
                next_review_at = excluded.next_review_at,
                last_reviewed_at = excluded.last_reviewed_at,
                learning_stage = excluded.learning_stage,
                review_count = excluded.review_count,
                correct_count = excluded.correct_count,
                consecutive_correct = excluded.consecutive_correct,
                updated_at = excluded.updated_at",
            params![
                record.learner_id,
                record.item_id,
                record.interval_days,
                record.ease_factor,
                record.next_review_at,
                record.last_reviewed_at,
                record.learning_stage.as_str(),
                record.review_count,
                record.correct_count,
                record.consecutive_correct,
                record.created_at,
                record.updated_at,
            ],
        )?;
        Ok(())
    }

    fn create_new(
        &self,
        learner_id: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ScheduleRecord> {
        let record = ScheduleRecord::new(learner_id, item_id, now);
        self.upsert(&record)?;
        Ok(record)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn test_store() -> (SqliteScheduleStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteScheduleStore::new(Some(dir.path().join("test.db"))).unwrap();
        (store, dir)
    }

    #[test]
    fn test_create_new_round_trip() {
        let (store, _dir) = test_store();
        let now = Utc::now();
        let record = store.create_new("learner-1", "item-1", now).unwrap();
        let fetched = store.get("learner-1", "item-1").unwrap().unwrap();
        assert_eq!(fetched.learner_id, record.learner_id);
        assert_eq!(fetched.item_id, record.item_id);
        assert_eq!(fetched.interval_days, 0);
        assert_eq!(fetched.learning_stage, LearningStage::New);
        assert!(fetched.last_reviewed_at.is_none());
    }

    #[test]
    fn test_get_absent_returns_none() {
        let (store, _dir) = test_store();
        assert!(store.get("learner-1", "missing").unwrap().is_none());
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let (store, _dir) = test_store();
        let now = Utc::now();
        let mut record = store.create_new("learner-1", "item-1", now).unwrap();

        record.interval_days = 6;
        record.ease_factor = 2.7;
        record.review_count = 1;
        record.correct_count = 1;
        record.consecutive_correct = 1;
        record.learning_stage = LearningStage::Learning;
        record.last_reviewed_at = Some(now);
        record.next_review_at = now + Duration::days(6);
        store.upsert(&record).unwrap();

        let fetched = store.get("learner-1", "item-1").unwrap().unwrap();
        assert_eq!(fetched.interval_days, 6);
        assert_eq!(fetched.learning_stage, LearningStage::Learning);
        assert_eq!(fetched.last_reviewed_at, record.last_reviewed_at);
    }

    #[test]
    fn test_list_due_ordering_and_limit() {
        let (store, _dir) = test_store();
        let now = Utc::now();

        for (item, days_overdue) in [("item-c", 1), ("item-a", 1), ("item-b", 4)] {
            let mut record = ScheduleRecord::new("learner-1", item, now);
            record.next_review_at = now - Duration::days(days_overdue);
            store.upsert(&record).unwrap();
        }
        let mut future = ScheduleRecord::new("learner-1", "item-z", now);
        future.next_review_at = now + Duration::days(2);
        store.upsert(&future).unwrap();

        let due = store.list_due("learner-1", now, 10).unwrap();
        let ids: Vec<&str> = due.iter().map(|r| r.item_id.as_str()).collect();
        // Most overdue first, ties broken by item id
        assert_eq!(ids, vec!["item-b", "item-a", "item-c"]);

        let limited = store.list_due("learner-1", now, 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_learners_are_isolated() {
        let (store, _dir) = test_store();
        let now = Utc::now();
        store.create_new("learner-1", "item-1", now).unwrap();
        store.create_new("learner-2", "item-1", now).unwrap();

        let due = store.list_due("learner-1", now, 10).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].learner_id, "learner-1");
    }

    #[test]
    fn test_open_in_memory() {
        let store = SqliteScheduleStore::open_in_memory().unwrap();
        let now = Utc::now();
        store.create_new("learner-1", "item-1", now).unwrap();
        assert!(store.get("learner-1", "item-1").unwrap().is_some());
    }
}
