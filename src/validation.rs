//! Input validation shared by the auth and session routes.
//!
//! The statistics engine assumes validated records; these checks are the
//! contract boundary that keeps malformed values out of the store.

use crate::constants::{
    MAX_DRILL_TYPE_LEN, MAX_NOTES_LEN, MAX_QUALITY_RATING, MIN_QUALITY_RATING,
};

/// Password strength: 8-256 chars with upper, lower and digit.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if password.len() > 256 {
        return Err("Password must be at most 256 characters");
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_upper || !has_lower || !has_digit {
        return Err("Password must contain an uppercase letter, a lowercase letter and a digit");
    }
    Ok(())
}

/// Email shape: user@domain.tld with a conservative character set.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }
    let parts: Vec<&str> = email.splitn(2, '@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if !local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'+' || b == b'-')
    {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }
    if !domain
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
    {
        return false;
    }
    domain
        .split('.')
        .all(|part| !part.is_empty() && !part.starts_with('-') && !part.ends_with('-'))
}

/// Username: 2-50 characters; letters, digits, underscore, hyphen and space.
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let char_count = username.chars().count();
    if char_count < 2 || char_count > 50 {
        return Err("Username must be between 2 and 50 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ' ')
    {
        return Err("Username may only contain letters, digits, underscores, hyphens and spaces");
    }
    Ok(())
}

/// Drill type labels are non-empty and bounded.
pub fn validate_drill_type(drill_type: &str) -> Result<(), &'static str> {
    if drill_type.trim().is_empty() {
        return Err("Drill type must not be empty");
    }
    if drill_type.len() > MAX_DRILL_TYPE_LEN {
        return Err("Drill type is too long");
    }
    Ok(())
}

/// Accuracy values are decimal percentages in 0-100.
pub fn validate_accuracy(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err("Accuracy must be between 0 and 100");
    }
    Ok(())
}

/// Timing values are non-negative seconds.
pub fn validate_timing(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || value < 0.0 {
        return Err("Timing values must be non-negative");
    }
    Ok(())
}

/// Quality ratings (vividness / flow) are on a 1-5 scale when present.
pub fn validate_quality_rating(value: u8) -> Result<(), &'static str> {
    if !(MIN_QUALITY_RATING..=MAX_QUALITY_RATING).contains(&value) {
        return Err("Quality ratings must be between 1 and 5");
    }
    Ok(())
}

pub fn validate_notes(notes: &str) -> Result<(), &'static str> {
    if notes.len() > MAX_NOTES_LEN {
        return Err("Notes are too long");
    }
    Ok(())
}
