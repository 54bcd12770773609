//! Input validation applied at the HTTP boundary.
//!
//! Every function here is pure and never panics on malformed input. Each one
//! either returns a normalized value or reports what was wrong with it.
//!
//! - [`definition`] - create/replace documents and batches
//! - [`params`] - ids, titles, bulk-delete bodies, comparators, search
//! - [`date_time`] - ISO 8601 filter timestamps

pub mod date_time;
pub mod definition;
pub mod params;

pub use date_time::validate_date_time;
pub use definition::{
    CreateRules, Field, LEGACY_KEY_COUNT, ShapePolicy, validate_create, validate_insert_many,
};
pub use params::{
    validate_comparator, validate_delete_definitions, validate_get_by_id, validate_get_by_title,
    validate_search,
};

use serde::Serialize;
use serde_json::{Value, json};

/// A single problem found in a definition document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("document must be a JSON object")]
    NotAnObject,
    #[error("expected exactly {expected} fields, got {actual}")]
    KeyCount { expected: usize, actual: usize },
    #[error("unknown field")]
    Unknown(String),
    #[error("missing required field")]
    Missing(Field),
    #[error("must be a non-empty string")]
    Blank(Field),
    #[error("must be one of: common, rare, unknown")]
    InvalidRarity,
    #[error("must be a list of strings")]
    NotStringList(Field),
    #[error("must be null or an object with `word` and `audio` keys")]
    InvalidPronunciation,
}

impl FieldError {
    /// JSON key the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            FieldError::NotAnObject | FieldError::KeyCount { .. } => None,
            FieldError::Unknown(key) => Some(key.as_str()),
            FieldError::Missing(field) | FieldError::Blank(field) | FieldError::NotStringList(field) => {
                Some(field.key())
            }
            FieldError::InvalidRarity => Some(Field::Rarity.key()),
            FieldError::InvalidPronunciation => Some(Field::Pronunciation.key()),
        }
    }

    fn to_json(&self) -> Value {
        json!({ "field": self.field(), "message": self.to_string() })
    }
}

/// Failures for one element of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFieldErrors {
    pub index: usize,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid definition")]
    Document(Vec<FieldError>),
    #[error("Invalid definitions")]
    Batch(Vec<IndexedFieldErrors>),
    #[error("Expected a JSON array of definitions")]
    NotAnArray,
    #[error("`{0}` must be a non-empty string")]
    BlankParam(&'static str),
    #[error("Invalid id '{0}'")]
    InvalidId(String),
    #[error("Invalid input")]
    InvalidInput,
    #[error("Invalid search pattern")]
    SearchPattern(String),
}

#[derive(Serialize)]
struct BatchItem {
    index: usize,
    fields: Vec<Value>,
}

impl ValidationError {
    /// Structured details for the error response body.
    pub fn details(&self) -> Value {
        match self {
            ValidationError::Document(errors) => {
                json!({ "fields": errors.iter().map(FieldError::to_json).collect::<Vec<_>>() })
            }
            ValidationError::Batch(failures) => {
                let items: Vec<BatchItem> = failures
                    .iter()
                    .map(|f| BatchItem {
                        index: f.index,
                        fields: f.errors.iter().map(FieldError::to_json).collect(),
                    })
                    .collect();
                json!({ "items": items })
            }
            ValidationError::SearchPattern(reason) => json!({ "reason": reason }),
            ValidationError::InvalidId(id) => json!({ "id": id }),
            _ => json!({}),
        }
    }
}
