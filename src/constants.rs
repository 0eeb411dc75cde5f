/// Default number of sessions returned by list endpoints.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Maximum number of sessions returned by list endpoints.
pub const MAX_PAGE_SIZE: usize = 500;

/// Maximum length of a drill type label.
pub const MAX_DRILL_TYPE_LEN: usize = 50;

/// Maximum length of free-form session notes.
pub const MAX_NOTES_LEN: usize = 2_000;

/// Quality ratings (vividness / flow) are captured on a 1-5 scale.
pub const MIN_QUALITY_RATING: u8 = 1;
pub const MAX_QUALITY_RATING: u8 = 5;

/// Maximum concurrent auth sessions kept per user; older ones are evicted.
pub const MAX_SESSIONS_PER_USER: usize = 10;
