pub fn user_key(user_id: &str) -> String {
    user_id.to_string()
}

pub fn user_email_index_key(email: &str) -> String {
    format!("email:{}", email.to_lowercase())
}

pub fn auth_session_key(token_hash: &str) -> String {
    token_hash.to_string()
}

pub fn auth_session_user_index_key(user_id: &str, token_hash: &str) -> String {
    format!("user:{}:{}", user_id, token_hash)
}

pub fn auth_session_user_index_prefix(user_id: &str) -> String {
    format!("user:{}:", user_id)
}

/// Record keys sort newest-first within a user: the session timestamp is
/// stored as `u64::MAX - ts` so a plain prefix scan yields descending order.
/// Shared by the practice and notation record trees.
pub fn record_key(user_id: &str, timestamp_ms: i64, record_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{}:{:020}:{}", user_id, reverse_ts, record_id)
}

pub fn record_prefix(user_id: &str) -> String {
    format!("{}:", user_id)
}
