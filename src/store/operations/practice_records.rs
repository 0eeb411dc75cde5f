use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{RecordQuery, Store, StoreError};

/// A general drill session: memorized pairs, per-pair timings and the
/// subjective quality ratings captured after recall.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRecord {
    pub id: String,
    pub user_id: String,
    pub session_date: DateTime<Utc>,
    pub drill_type: String,
    pub pair_count: u32,
    pub pairs: Vec<serde_json::Value>,
    pub timings: Vec<f64>,
    pub average_time: f64,
    pub total_time: Option<f64>,
    pub recall_accuracy: f64,
    pub vividness: Option<u8>,
    pub flow: Option<u8>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn create_practice_record(&self, record: &PracticeRecord) -> Result<(), StoreError> {
        let ts = record.session_date.timestamp_millis();
        let key = keys::record_key(&record.user_id, ts, &record.id);
        self.practice_records
            .insert(key.as_bytes(), Self::serialize(record)?)?;
        Ok(())
    }

    pub fn get_user_practice_record(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<Option<PracticeRecord>, StoreError> {
        let prefix = keys::record_prefix(user_id);
        let suffix = format!(":{record_id}");

        for item in self.practice_records.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            if String::from_utf8_lossy(&key).ends_with(&suffix) {
                return Ok(Some(Self::deserialize::<PracticeRecord>(&value)?));
            }
        }

        Ok(None)
    }

    /// All of one user's practice records, newest session first.
    pub fn list_user_practice_records(
        &self,
        user_id: &str,
    ) -> Result<Vec<PracticeRecord>, StoreError> {
        let prefix = keys::record_prefix(user_id);
        let mut records = Vec::new();
        for item in self.practice_records.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            records.push(Self::deserialize::<PracticeRecord>(&value)?);
        }
        Ok(records)
    }

    pub fn query_user_practice_records(
        &self,
        user_id: &str,
        query: &RecordQuery,
    ) -> Result<Vec<PracticeRecord>, StoreError> {
        let prefix = keys::record_prefix(user_id);
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for item in self.practice_records.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            let record: PracticeRecord = Self::deserialize(&value)?;
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

    /// Every practice record across all users, for population aggregation.
    pub fn list_all_practice_records(&self) -> Result<Vec<PracticeRecord>, StoreError> {
        let mut records = Vec::new();
        for item in self.practice_records.iter() {
            let (_, value) = item?;
            records.push(Self::deserialize::<PracticeRecord>(&value)?);
        }
        Ok(records)
    }

    /// Returns whether a record was actually removed.
    pub fn delete_practice_record(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<bool, StoreError> {
        let prefix = keys::record_prefix(user_id);
        let suffix = format!(":{record_id}");

        for item in self.practice_records.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            if String::from_utf8_lossy(&key).ends_with(&suffix) {
                self.practice_records.remove(key)?;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn record_matches(record: &PracticeRecord, query: &RecordQuery) -> bool {
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
