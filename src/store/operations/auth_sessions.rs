use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl Store {
    pub fn create_auth_session(&self, session: &AuthSession) -> Result<(), StoreError> {
        let key = keys::auth_session_key(&session.token_hash);
        let index_key =
            keys::auth_session_user_index_key(&session.user_id, &session.token_hash);
        let session_bytes = Self::serialize(session)?;

        let key_bytes = key.as_bytes().to_vec();
        let index_key_bytes = index_key.as_bytes().to_vec();
        self.auth_sessions
            .transaction(move |tx| {
                tx.insert(key_bytes.as_slice(), session_bytes.as_slice())?;
                tx.insert(index_key_bytes.as_slice(), &[] as &[u8])?;
                Ok(())
            })
            .map_err(|e: sled::transaction::TransactionError<()>| match e {
                sled::transaction::TransactionError::Abort(()) => {
                    StoreError::Sled(sled::Error::Unsupported("transaction aborted".into()))
                }
                sled::transaction::TransactionError::Storage(se) => StoreError::Sled(se),
            })?;
        Ok(())
    }

    /// Returns None for expired or revoked sessions. No delete side effect;
    /// physical removal is the session sweep worker's job.
    pub fn get_auth_session(&self, token_hash: &str) -> Result<Option<AuthSession>, StoreError> {
        let key = keys::auth_session_key(token_hash);
        let Some(raw) = self.auth_sessions.get(key.as_bytes())? else {
            return Ok(None);
        };

        let session = Self::deserialize::<AuthSession>(&raw)?;
        if session.revoked || session.expires_at <= Utc::now() {
            return Ok(None);
        }

        Ok(Some(session))
    }

    pub fn delete_auth_session(&self, token_hash: &str) -> Result<(), StoreError> {
        let key = keys::auth_session_key(token_hash);
        let Some(raw) = self.auth_sessions.get(key.as_bytes())? else {
            return Ok(());
        };
        let session = Self::deserialize::<AuthSession>(&raw)?;
        let index_key = keys::auth_session_user_index_key(&session.user_id, token_hash);

        self.auth_sessions.remove(index_key.as_bytes())?;
        self.auth_sessions.remove(key.as_bytes())?;
        Ok(())
    }

    /// Revokes every session of one user (password change, account actions).
    pub fn delete_user_auth_sessions(&self, user_id: &str) -> Result<usize, StoreError> {
        let prefix = keys::auth_session_user_index_prefix(user_id);
        let mut index_keys: Vec<Vec<u8>> = Vec::new();
        for item in self.auth_sessions.scan_prefix(prefix.as_bytes()) {
            let (index_key, _) = item?;
            index_keys.push(index_key.to_vec());
        }

        let removed = index_keys.len();
        for index_key in index_keys {
            let index_text = String::from_utf8_lossy(&index_key).to_string();
            if let Some(token_hash) = index_text.strip_prefix(&prefix) {
                self.auth_sessions.remove(token_hash.as_bytes())?;
            }
            self.auth_sessions.remove(index_key)?;
        }
        Ok(removed)
    }

    /// Keeps at most `max_sessions` per user, dropping the oldest first.
    pub fn cleanup_oldest_user_sessions(
        &self,
        user_id: &str,
        max_sessions: usize,
    ) -> Result<usize, StoreError> {
        let prefix = keys::auth_session_user_index_prefix(user_id);
        let mut sessions: Vec<AuthSession> = Vec::new();
        for item in self.auth_sessions.scan_prefix(prefix.as_bytes()) {
            let (index_key, _) = item?;
            let index_text = String::from_utf8_lossy(&index_key).to_string();
            let Some(token_hash) = index_text.strip_prefix(&prefix) else {
                continue;
            };
            if let Some(raw) = self.auth_sessions.get(token_hash.as_bytes())? {
                sessions.push(Self::deserialize(&raw)?);
            } else {
                // Dangling index entry; drop it.
                self.auth_sessions.remove(index_key)?;
            }
        }

        if sessions.len() <= max_sessions {
            return Ok(0);
        }

        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let excess = sessions.len() - max_sessions;
        for session in sessions.into_iter().take(excess) {
            self.delete_auth_session(&session.token_hash)?;
        }
        Ok(excess)
    }

    /// Physically removes expired and revoked sessions. Called periodically
    /// by the session sweep worker.
    pub fn cleanup_expired_auth_sessions(&self) -> Result<usize, StoreError> {
        let now = Utc::now();
        let mut expired: Vec<String> = Vec::new();
        for item in self.auth_sessions.iter() {
            let (key, value) = item?;
            if String::from_utf8_lossy(&key).starts_with("user:") {
                continue;
            }
            let session: AuthSession = Self::deserialize(&value)?;
            if session.revoked || session.expires_at <= now {
                expired.push(session.token_hash);
            }
        }

        let count = expired.len();
        for token_hash in expired {
            self.delete_auth_session(&token_hash)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tempfile::tempdir;

    use super::*;

    fn sample_session(token_hash: &str, user_id: &str, ttl_hours: i64) -> AuthSession {
        AuthSession {
            token_hash: token_hash.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::hours(ttl_hours),
            revoked: false,
        }
    }

    fn open_store(name: &str) -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join(name).to_str().unwrap()).unwrap();
        (dir, store)
    }

    #[test]
    fn create_and_get_session() {
        let (_dir, store) = open_store("sessions-db");

        store.create_auth_session(&sample_session("h1", "u1", 1)).unwrap();
        let got = store.get_auth_session("h1").unwrap().unwrap();
        assert_eq!(got.user_id, "u1");
    }

    #[test]
    fn expired_session_resolves_to_none() {
        let (_dir, store) = open_store("sessions-db2");

        store.create_auth_session(&sample_session("h1", "u1", -1)).unwrap();
        assert!(store.get_auth_session("h1").unwrap().is_none());
    }

    #[test]
    fn delete_user_sessions_removes_all() {
        let (_dir, store) = open_store("sessions-db3");

        store.create_auth_session(&sample_session("h1", "u1", 1)).unwrap();
        store.create_auth_session(&sample_session("h2", "u1", 1)).unwrap();
        store.create_auth_session(&sample_session("h3", "u2", 1)).unwrap();

        let removed = store.delete_user_auth_sessions("u1").unwrap();
        assert_eq!(removed, 2);
        assert!(store.get_auth_session("h1").unwrap().is_none());
        assert!(store.get_auth_session("h2").unwrap().is_none());
        assert!(store.get_auth_session("h3").unwrap().is_some());
    }

    #[test]
    fn cleanup_expired_removes_only_stale() {
        let (_dir, store) = open_store("sessions-db4");

        store.create_auth_session(&sample_session("live", "u1", 1)).unwrap();
        store.create_auth_session(&sample_session("stale", "u1", -1)).unwrap();

        let removed = store.cleanup_expired_auth_sessions().unwrap();
        assert_eq!(removed, 1);
        assert!(store.get_auth_session("live").unwrap().is_some());
        // Physically gone, not just filtered on read.
        assert!(store
            .auth_sessions
            .get("stale".as_bytes())
            .unwrap()
            .is_none());
    }

    #[test]
    fn oldest_sessions_evicted_beyond_cap() {
        let (_dir, store) = open_store("sessions-db5");

        let mut oldest = sample_session("h-old", "u1", 1);
        oldest.created_at = Utc::now() - Duration::hours(10);
        store.create_auth_session(&oldest).unwrap();
        store.create_auth_session(&sample_session("h-a", "u1", 1)).unwrap();
        store.create_auth_session(&sample_session("h-b", "u1", 1)).unwrap();

        let evicted = store.cleanup_oldest_user_sessions("u1", 2).unwrap();
        assert_eq!(evicted, 1);
        assert!(store.get_auth_session("h-old").unwrap().is_none());
        assert!(store.get_auth_session("h-a").unwrap().is_some());
    }
}
