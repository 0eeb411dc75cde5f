pub const USERS: &str = "users";
pub const AUTH_SESSIONS: &str = "auth_sessions";
pub const PRACTICE_RECORDS: &str = "practice_records";
pub const NOTATION_RECORDS: &str = "notation_records";
