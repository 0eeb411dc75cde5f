use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{RecordQuery, Store, StoreError};

/// A notation drill session. Structurally parallel to `PracticeRecord` but
/// a distinct kind: accuracy is piece-based and there are no quality
/// ratings or memorized pairs. The two kinds are only unified at
/// aggregation time, never in storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotationRecord {
    pub id: String,
    pub user_id: String,
    pub session_date: DateTime<Utc>,
    pub drill_type: String,
    pub attempts: Vec<serde_json::Value>,
    pub total_pieces: u32,
    pub correct_count: u32,
    pub accuracy: f64,
    pub average_time: f64,
    pub total_time: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn create_notation_record(&self, record: &NotationRecord) -> Result<(), StoreError> {
        let ts = record.session_date.timestamp_millis();
        let key = keys::record_key(&record.user_id, ts, &record.id);
        self.notation_records
            .insert(key.as_bytes(), Self::serialize(record)?)?;
        Ok(())
    }

    pub fn get_user_notation_record(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<Option<NotationRecord>, StoreError> {
        let prefix = keys::record_prefix(user_id);
        let suffix = format!(":{record_id}");

        for item in self.notation_records.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            if String::from_utf8_lossy(&key).ends_with(&suffix) {
                return Ok(Some(Self::deserialize::<NotationRecord>(&value)?));
            }
        }

        Ok(None)
    }

    /// All of one user's notation records, newest session first.
    pub fn list_user_notation_records(
        &self,
        user_id: &str,
    ) -> Result<Vec<NotationRecord>, StoreError> {
        let prefix = keys::record_prefix(user_id);
        let mut records = Vec::new();
        for item in self.notation_records.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            records.push(Self::deserialize::<NotationRecord>(&value)?);
        }
        Ok(records)
    }

    pub fn query_user_notation_records(
        &self,
        user_id: &str,
        query: &RecordQuery,
    ) -> Result<Vec<NotationRecord>, StoreError> {
        let prefix = keys::record_prefix(user_id);
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for item in self.notation_records.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            let record: NotationRecord = Self::deserialize(&value)?;
            if !record_matches(&record, query) {
                continue;
            }
            if skipped < query.skip {
                skipped += 1;
                continue;
            }
            records.push(record);
            if query.limit > 0 && records.len() >= query.limit {
                break;
            }
        }
        Ok(records)
    }

    /// Every notation record across all users, for population aggregation.
    pub fn list_all_notation_records(&self) -> Result<Vec<NotationRecord>, StoreError> {
        let mut records = Vec::new();
        for item in self.notation_records.iter() {
            let (_, value) = item?;
            records.push(Self::deserialize::<NotationRecord>(&value)?);
        }
        Ok(records)
    }

    /// Returns whether a record was actually removed.
    pub fn delete_notation_record(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<bool, StoreError> {
        let prefix = keys::record_prefix(user_id);
        let suffix = format!(":{record_id}");

        for item in self.notation_records.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            if String::from_utf8_lossy(&key).ends_with(&suffix) {
                self.notation_records.remove(key)?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn record_matches(record: &NotationRecord, query: &RecordQuery) -> bool {
    if let Some(ref drill_type) = query.drill_type {
        if &record.drill_type != drill_type {
            return false;
        }
    }
    if let Some(start) = query.start_date {
        if record.session_date < start {
            return false;
        }
    }
    if let Some(end) = query.end_date {
        if record.session_date > end {
            return false;
        }
    }
    true
}
