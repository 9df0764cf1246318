//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use shared::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Customer names, item names
pub const MAX_NAME_LEN: usize = 200;

/// Order notes
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, ids
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Phone digits (including a leading `+`) kept after stripping separators
pub const PHONE_MIN_DIGITS: usize = 8;
pub const PHONE_MAX_DIGITS: usize = 15;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field, format!("{field} is required")));
    }
    validate_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Unwrap a required request field, rejecting absent or blank values
pub fn require_field(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::required(field, format!("{field} is required"))),
    }
}

/// Loose phone check: keep digits and `+`, then count 8..=15
///
/// Separators such as spaces, dashes and brackets are ignored.
pub fn validate_phone(value: &str, field: &str) -> Result<(), AppError> {
    validate_required_text(value, field, MAX_SHORT_TEXT_LEN)?;
    let kept = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .count();
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&kept) {
        return Err(AppError::validation(format!(
            "{field} must contain {PHONE_MIN_DIGITS} to {PHONE_MAX_DIGITS} digits"
        ))
        .with_detail("field", field));
    }
    Ok(())
}
