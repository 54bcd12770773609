//! Boundary validation for create and replace payloads.
//!
//! Request bodies arrive as loosely-typed JSON. [`validate_create`] checks the
//! document shape against [`CreateRules`], extracts every field with its
//! expected type, runs content rules through `validator`, and returns a
//! trimmed [`NewDefinition`] with defaults applied.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use validator::Validate;

use crate::domain::entities::{NewDefinition, Pronunciation, Rarity};
use crate::validation::{FieldError, IndexedFieldErrors, ValidationError};

/// Number of caller-supplied keys accepted by [`ShapePolicy::ExactKeyCount`]
/// in legacy mode.
pub const LEGACY_KEY_COUNT: usize = 7;

/// Top-level fields of a definition document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Definition,
    Category,
    PartOfSpeech,
    ExampleUsage,
    Rarity,
    SpellingVariations,
    Synonyms,
    Pronunciation,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Title,
        Field::Definition,
        Field::Category,
        Field::PartOfSpeech,
        Field::ExampleUsage,
        Field::Rarity,
        Field::SpellingVariations,
        Field::Synonyms,
        Field::Pronunciation,
    ];

    /// JSON key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Definition => "definition",
            Field::Category => "category",
            Field::PartOfSpeech => "partOfSpeech",
            Field::ExampleUsage => "exampleUsage",
            Field::Rarity => "rarity",
            Field::SpellingVariations => "spellingVariations",
            Field::Synonyms => "synonyms",
            Field::Pronunciation => "pronunciation",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Name of the matching field on [`DefinitionDocument`], as reported by
    /// `validator`.
    fn struct_name(&self) -> &'static str {
        match self {
            Field::PartOfSpeech => "part_of_speech",
            Field::ExampleUsage => "example_usage",
            Field::SpellingVariations => "spelling_variations",
            other => other.key(),
        }
    }

    /// Whether an absent value can be replaced by a default.
    pub fn has_default(&self) -> bool {
        matches!(
            self,
            Field::Rarity | Field::SpellingVariations | Field::Synonyms | Field::Pronunciation
        )
    }
}

/// How the set of top-level keys is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapePolicy {
    /// Every key must be a known [`Field`] and every required field present.
    Schema,
    /// The document must have exactly this many keys. Unknown keys are
    /// ignored and absent defaultable fields take their default.
    ExactKeyCount(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRules {
    pub shape: ShapePolicy,
    optional: BTreeSet<Field>,
}

impl Default for CreateRules {
    fn default() -> Self {
        Self {
            shape: ShapePolicy::Schema,
            optional: BTreeSet::from([Field::SpellingVariations, Field::Synonyms]),
        }
    }
}

impl CreateRules {
    /// Builds rules with the given optional fields.
    ///
    /// # Errors
    ///
    /// Returns the offending field if it has no default value.
    pub fn new(
        shape: ShapePolicy,
        optional: impl IntoIterator<Item = Field>,
    ) -> Result<Self, Field> {
        let optional: BTreeSet<Field> = optional.into_iter().collect();
        if let Some(field) = optional.iter().find(|f| !f.has_default()) {
            return Err(*field);
        }
        Ok(Self { shape, optional })
    }

    /// Rules for the legacy exact-seven-keys check.
    pub fn legacy() -> Self {
        Self {
            shape: ShapePolicy::ExactKeyCount(LEGACY_KEY_COUNT),
            optional: Field::ALL.into_iter().filter(Field::has_default).collect(),
        }
    }

    pub fn is_required(&self, field: Field) -> bool {
        !self.optional.contains(&field)
    }

    pub fn optional_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.optional.iter().copied()
    }
}

/// Typed view of a definition document before normalization.
#[derive(Debug, Validate)]
struct DefinitionDocument {
    #[validate(custom(function = "not_blank"))]
    title: String,
    #[validate(custom(function = "not_blank"))]
    definition: String,
    #[validate(custom(function = "not_blank"))]
    category: String,
    #[validate(custom(function = "not_blank"))]
    part_of_speech: String,
    #[validate(custom(function = "not_blank"))]
    example_usage: String,
    #[validate(custom(function = "known_rarity"))]
    rarity: String,
    spelling_variations: Vec<String>,
    synonyms: Vec<String>,
    pronunciation: Pronunciation,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

fn known_rarity(value: &str) -> Result<(), validator::ValidationError> {
    value
        .trim()
        .parse::<Rarity>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("rarity"))
}

impl DefinitionDocument {
    fn into_new_definition(self) -> NewDefinition {
        NewDefinition {
            title: self.title.trim().to_string(),
            definition: self.definition.trim().to_string(),
            category: self.category.trim().to_string(),
            part_of_speech: self.part_of_speech.trim().to_string(),
            example_usage: self.example_usage.trim().to_string(),
            rarity: self.rarity.trim().parse().unwrap_or_default(),
            spelling_variations: self.spelling_variations,
            synonyms: self.synonyms,
            pronunciation: self.pronunciation,
        }
    }
}

/// Validates a single create document.
///
/// # Errors
///
/// Returns [`ValidationError::Document`] listing every failing field.
pub fn validate_create(doc: &Value, rules: &CreateRules) -> Result<NewDefinition, ValidationError> {
    check_document(doc, rules).map_err(ValidationError::Document)
}

/// Validates every element of an array of create documents.
///
/// All elements are checked; the error lists each failing index.
///
/// # Errors
///
/// Returns [`ValidationError::NotAnArray`] for non-array input and
/// [`ValidationError::Batch`] when any element fails.
pub fn validate_insert_many(
    docs: &Value,
    rules: &CreateRules,
) -> Result<Vec<NewDefinition>, ValidationError> {
    let items = docs.as_array().ok_or(ValidationError::NotAnArray)?;

    let mut valid = Vec::with_capacity(items.len());
    let mut failures = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match check_document(item, rules) {
            Ok(definition) => valid.push(definition),
            Err(errors) => failures.push(IndexedFieldErrors { index, errors }),
        }
    }

    if failures.is_empty() {
        Ok(valid)
    } else {
        Err(ValidationError::Batch(failures))
    }
}

fn check_document(doc: &Value, rules: &CreateRules) -> Result<NewDefinition, Vec<FieldError>> {
    let Some(object) = doc.as_object() else {
        return Err(vec![FieldError::NotAnObject]);
    };

    let mut errors = check_shape(object, rules);

    let title = extract_string(object, Field::Title, rules, &mut errors);
    let definition = extract_string(object, Field::Definition, rules, &mut errors);
    let category = extract_string(object, Field::Category, rules, &mut errors);
    let part_of_speech = extract_string(object, Field::PartOfSpeech, rules, &mut errors);
    let example_usage = extract_string(object, Field::ExampleUsage, rules, &mut errors);
    let rarity = extract_string(object, Field::Rarity, rules, &mut errors);
    let spelling_variations =
        extract_string_list(object, Field::SpellingVariations, rules, &mut errors);
    let synonyms = extract_string_list(object, Field::Synonyms, rules, &mut errors);
    let pronunciation = extract_pronunciation(object, rules, &mut errors);

    let document = DefinitionDocument {
        title: title.unwrap_or_default(),
        definition: definition.unwrap_or_default(),
        category: category.unwrap_or_default(),
        part_of_speech: part_of_speech.unwrap_or_default(),
        example_usage: example_usage.unwrap_or_default(),
        rarity: rarity.unwrap_or_else(|| Rarity::default().to_string()),
        spelling_variations: spelling_variations.unwrap_or_default(),
        synonyms: synonyms.unwrap_or_default(),
        pronunciation: pronunciation.unwrap_or_default(),
    };

    if let Err(content_errors) = document.validate() {
        let failed = content_errors.field_errors();
        for field in Field::ALL {
            if !failed.contains_key(field.struct_name()) {
                continue;
            }
            // A field that already failed extraction was defaulted and is not reported twice.
            if errors.iter().any(|e| e.field() == Some(field.key())) {
                continue;
            }
            errors.push(match field {
                Field::Rarity => FieldError::InvalidRarity,
                other => FieldError::Blank(other),
            });
        }
    }

    if errors.is_empty() {
        Ok(document.into_new_definition())
    } else {
        Err(errors)
    }
}

fn check_shape(object: &Map<String, Value>, rules: &CreateRules) -> Vec<FieldError> {
    match rules.shape {
        ShapePolicy::ExactKeyCount(expected) if object.len() != expected => {
            vec![FieldError::KeyCount {
                expected,
                actual: object.len(),
            }]
        }
        ShapePolicy::ExactKeyCount(_) => Vec::new(),
        ShapePolicy::Schema => object
            .keys()
            .filter(|key| Field::from_key(key).is_none())
            .map(|key| FieldError::Unknown(key.clone()))
            .collect(),
    }
}

/// Looks up a field, recording [`FieldError::Missing`] when a required field
/// is absent. Returns `None` for absent fields.
fn lookup<'a>(
    object: &'a Map<String, Value>,
    field: Field,
    rules: &CreateRules,
    errors: &mut Vec<FieldError>,
) -> Option<&'a Value> {
    let value = object.get(field.key());
    if value.is_none() && (!field.has_default() || rules.is_required(field)) {
        errors.push(FieldError::Missing(field));
    }
    value
}

fn extract_string(
    object: &Map<String, Value>,
    field: Field,
    rules: &CreateRules,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match lookup(object, field, rules, errors)? {
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.push(match field {
                Field::Rarity => FieldError::InvalidRarity,
                other => FieldError::Blank(other),
            });
            None
        }
    }
}

fn extract_string_list(
    object: &Map<String, Value>,
    field: Field,
    rules: &CreateRules,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<String>> {
    let value = lookup(object, field, rules, errors)?;

    let list = value.as_array().and_then(|items| {
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
    });

    if list.is_none() {
        errors.push(FieldError::NotStringList(field));
    }
    list
}

fn extract_pronunciation(
    object: &Map<String, Value>,
    rules: &CreateRules,
    errors: &mut Vec<FieldError>,
) -> Option<Pronunciation> {
    let pronunciation = match lookup(object, Field::Pronunciation, rules, errors)? {
        Value::Null => Some(Pronunciation::default()),
        Value::Object(parts) => match (parts.get("word"), parts.get("audio")) {
            (Some(word), Some(audio)) => nullable_string(word)
                .zip(nullable_string(audio))
                .map(|(word, audio)| Pronunciation { word, audio }),
            _ => None,
        },
        _ => None,
    };

    if pronunciation.is_none() {
        errors.push(FieldError::InvalidPronunciation);
    }
    pronunciation
}

/// `Some(None)` for JSON null, `Some(Some(s))` for a string, `None` otherwise.
fn nullable_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}
