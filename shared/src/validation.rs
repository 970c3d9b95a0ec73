//! Input validation helpers
//!
//! Text length limits shared by catalog saves and tracker creation.

use crate::error::AppError;

/// Meal, ingredient and tracker names
pub const MAX_NAME_LEN: usize = 200;

/// Meal descriptions
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Ids, tags, weights and measures
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Image URLs and redirect outlinks
pub const MAX_URL_LEN: usize = 2048;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
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
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}
