//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every write path enforces the same rules.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim a required text field, rejecting blank input.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidField(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank input becomes `None`.
pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Canonical form of a login name: NFKC, lowercase, no whitespace.
///
/// Applied both when storing and when looking up credentials, so `"Rani"` and
/// `"ｒａｎｉ"` resolve to the same user.
pub(crate) fn normalize_username(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidField(
            "username must not be empty".to_string(),
        ));
    }
    let normalized: String = trimmed.nfkc().flat_map(char::to_lowercase).collect();
    if normalized.chars().any(char::is_whitespace) {
        return Err(EngineError::InvalidField(
            "username must not contain spaces".to_string(),
        ));
    }
    Ok(normalized)
}
