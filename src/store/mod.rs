pub mod keys;
pub mod operations;
pub mod trees;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub users: sled::Tree,
    pub auth_sessions: sled::Tree,
    pub practice_records: sled::Tree,
    pub notation_records: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
}

/// Filters applied by the session listing endpoints. `limit == 0` means
/// "no explicit limit" and falls back to the caller's default.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub drill_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub skip: usize,
    pub limit: usize,
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let users = db.open_tree(trees::USERS)?;
        let auth_sessions = db.open_tree(trees::AUTH_SESSIONS)?;
        let practice_records = db.open_tree(trees::PRACTICE_RECORDS)?;
        let notation_records = db.open_tree(trees::NOTATION_RECORDS)?;

        Ok(Self {
            db,
            users,
            auth_sessions,
            practice_records,
            notation_records,
        })
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn raw_db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
