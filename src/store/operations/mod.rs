pub mod auth_sessions;
pub mod notation_records;
pub mod practice_records;
pub mod users;
