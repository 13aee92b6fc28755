//! Input validation rules shared by the API handlers.
//!
//! Rules operate on the raw request values and return the cleaned value
//! that gets persisted (titles and tag names are always stored trimmed).

use crate::error::CoreError;

/// Maximum length of a tag name, in characters.
pub const MAX_TAG_NAME_LEN: usize = 50;

/// Validate a required title field: present, non-blank after trimming.
///
/// Returns the trimmed title.
pub fn validate_title(title: Option<&str>) -> Result<String, CoreError> {
    let trimmed = title.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title is required".into()));
    }
    Ok(trimmed.to_string())
}

/// Validate a tag name: present, non-blank after trimming, at most
/// [`MAX_TAG_NAME_LEN`] characters.
///
/// Returns the trimmed name.
pub fn validate_tag_name(name: Option<&str>) -> Result<String, CoreError> {
    let trimmed = name.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name is required".into()));
    }
    if trimmed.chars().count() > MAX_TAG_NAME_LEN {
        return Err(CoreError::Validation(
            "Name must be 50 characters or less".into(),
        ));
    }
    Ok(trimmed.to_string())
}
