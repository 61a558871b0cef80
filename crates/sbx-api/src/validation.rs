use validator::ValidateLength;

use crate::error::ApiError;

/// Longest name a topic, category or contributor may have
pub const MAX_NAME_LENGTH: u64 = 255;

/// Longest description or suggestion body
pub const MAX_TEXT_LENGTH: u64 = 4096;

/// Validate a short, required name field
///
/// # Examples
/// ```
/// use sbx_api::validation::validate_name;
///
/// assert!(validate_name("name", "Ideas").is_ok());
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> Result<(), ApiError> {
    validate_required(field, value, MAX_NAME_LENGTH)
}

/// Validate a longer, required free-text field
pub fn validate_text(field: &str, value: &str) -> Result<(), ApiError> {
    validate_required(field, value, MAX_TEXT_LENGTH)
}

fn validate_required(field: &str, value: &str, max: u64) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} cannot be empty")));
    }

    if !value.validate_length(None, Some(max), None) {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters long"
        )));
    }

    Ok(())
}

/// Validate a parent identifier supplied in a request body
pub fn validate_id(field: &str, id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::Validation(format!("{field} must be a positive id")));
    }

    Ok(())
}
