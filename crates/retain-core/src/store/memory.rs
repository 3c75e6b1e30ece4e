//! In-Memory Schedule Store
//!
//! HashMap-backed store for tests and ephemeral deployments. Interior
//! mutability through a `Mutex` so all trait methods take `&self`.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::{Result, ScheduleStore, StoreError};
use crate::schedule::ScheduleRecord;

/// In-memory schedule store keyed by `(learner_id, item_id)`.
#[derive(Debug, Default)]
pub struct MemoryScheduleStore {
    records: Mutex<HashMap<(String, String), ScheduleRecord>>,
}

impl MemoryScheduleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, across all learners
    pub fn len(&self) -> usize {
        self.records.lock().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn get(&self, learner_id: &str, item_id: &str) -> Result<Option<ScheduleRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))?;
        Ok(records
            .get(&(learner_id.to_string(), item_id.to_string()))
            .cloned())
    }

    fn list_due(
        &self,
        learner_id: &str,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ScheduleRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))?;

        let mut due: Vec<ScheduleRecord> = records
            .values()
            .filter(|record| record.learner_id == learner_id && record.is_due(now))
            .cloned()
            .collect();
        due.sort_by(|a, b| {
            a.next_review_at
                .cmp(&b.next_review_at)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        due.truncate(limit);
        Ok(due)
    }

    fn upsert(&self, record: &ScheduleRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".to_string()))?;
        records.insert(
            (record.learner_id.clone(), record.item_id.clone()),
            record.clone(),
        );
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
