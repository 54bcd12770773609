//! Validation of path, query and small body parameters.

use regex::RegexBuilder;
use serde_json::Value;

use crate::domain::query::Comparator;
use crate::validation::ValidationError;

/// Compiled-program size limit for user-supplied search patterns.
const SEARCH_PATTERN_SIZE_LIMIT: usize = 1 << 16;

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Requires a non-empty title and returns it trimmed.
///
/// # Errors
///
/// Returns [`ValidationError::BlankParam`] for an empty or whitespace title.
pub fn validate_get_by_title(raw: &str) -> Result<String, ValidationError> {
    non_blank(raw).ok_or(ValidationError::BlankParam("title"))
}

/// Requires a non-empty id that is a valid store identifier.
///
/// # Errors
///
/// Returns [`ValidationError::BlankParam`] for an empty id and
/// [`ValidationError::InvalidId`] when it is not an integer.
pub fn validate_get_by_id(raw: &str) -> Result<i64, ValidationError> {
    let id = non_blank(raw).ok_or(ValidationError::BlankParam("id"))?;
    id.parse().map_err(|_| ValidationError::InvalidId(id))
}

/// Extracts the usable ids from a `{"ids": [...]}` body.
///
/// Entries that are not strings or are blank are dropped; the rest are
/// trimmed. A missing or non-array `ids` yields an empty list.
pub fn validate_delete_definitions(body: &Value) -> Vec<String> {
    body.get("ids")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .filter_map(non_blank)
                .collect()
        })
        .unwrap_or_default()
}

pub fn validate_comparator(raw: &str) -> Option<Comparator> {
    Comparator::parse(raw)
}

/// Normalizes a title search pattern.
///
/// Returns `Ok(None)` for a blank pattern.
///
/// # Errors
///
/// Returns [`ValidationError::SearchPattern`] when the pattern is not a valid
/// regular expression.
pub fn validate_search(raw: &str) -> Result<Option<String>, ValidationError> {
    let Some(pattern) = non_blank(raw) else {
        return Ok(None);
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .size_limit(SEARCH_PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| ValidationError::SearchPattern(e.to_string()))?;

    Ok(Some(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_by_title() {
        assert_eq!(validate_get_by_title("  Sheng ").unwrap(), "Sheng");
        assert!(matches!(
            validate_get_by_title("   "),
            Err(ValidationError::BlankParam("title"))
        ));
    }

    #[test]
    fn test_get_by_id() {
        assert_eq!(validate_get_by_id(" 42 ").unwrap(), 42);
        assert!(matches!(
            validate_get_by_id(""),
            Err(ValidationError::BlankParam("id"))
        ));
        assert!(matches!(
            validate_get_by_id("63ee2b80f2c91c3089905cfb"),
            Err(ValidationError::InvalidId(_))
        ));
    }

    #[test]
    fn test_delete_definitions_drops_invalid_entries() {
        let body = json!({ "ids": ["a", "", " b ", 5] });
        assert_eq!(validate_delete_definitions(&body), vec!["a", "b"]);
    }

    #[test]
    fn test_delete_definitions_without_ids() {
        assert!(validate_delete_definitions(&json!({})).is_empty());
        assert!(validate_delete_definitions(&json!({ "ids": "1" })).is_empty());
        assert!(validate_delete_definitions(&json!(["1"])).is_empty());
    }

    #[test]
    fn test_search_blank_is_none() {
        assert_eq!(validate_search("   ").unwrap(), None);
    }

    #[test]
    fn test_search_is_trimmed() {
        assert_eq!(validate_search(" kenya ").unwrap().as_deref(), Some("kenya"));
    }

    #[test]
    fn test_search_rejects_invalid_regex() {
        assert!(matches!(
            validate_search("(unclosed"),
            Err(ValidationError::SearchPattern(_))
        ));
    }
}
