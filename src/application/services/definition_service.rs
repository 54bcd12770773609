//! Definition creation, lookup, replacement and deletion.

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::domain::entities::{Definition, DefinitionKey};
use crate::domain::repositories::DefinitionRepository;
use crate::error::AppError;
use crate::validation::{
    CreateRules, FieldError, ValidationError, validate_create, validate_delete_definitions,
    validate_get_by_id, validate_get_by_title, validate_insert_many,
};

/// Result of a create request: a single document or a batch.
#[derive(Debug, Clone)]
pub enum Created {
    One(Definition),
    Many(Vec<Definition>),
}

/// Service for the definition resource.
///
/// Every input arrives loosely typed and passes through the validators in
/// [`crate::validation`] before it reaches the repository.
pub struct DefinitionService {
    repository: Arc<dyn DefinitionRepository>,
    rules: CreateRules,
}

impl DefinitionService {
    /// Creates a new definition service.
    pub fn new(repository: Arc<dyn DefinitionRepository>, rules: CreateRules) -> Self {
        Self { repository, rules }
    }

    pub fn rules(&self) -> &CreateRules {
        &self.rules
    }

    /// Creates one definition from an object body or many from an array body.
    ///
    /// A batch is inserted atomically: either every element is stored or none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - The body fails the create rules (per-field or per-index details)
    /// - The batch is empty
    ///
    /// Returns [`AppError::Conflict`] if a title already exists.
    pub async fn create(&self, body: Value) -> Result<Created, AppError> {
        if body.is_array() {
            let new_definitions = validate_insert_many(&body, &self.rules).inspect_err(|e| {
                tracing::debug!(error = %e, "Rejected definition batch");
            })?;

            if new_definitions.is_empty() {
                return Err(AppError::bad_request(
                    "At least one definition is required",
                    json!({}),
                ));
            }

            let created = self.repository.insert_many(new_definitions).await?;
            metrics::counter!("definitions_created_total").increment(created.len() as u64);
            tracing::info!(count = created.len(), "Created definitions");

            return Ok(Created::Many(created));
        }

        let new_definition = validate_create(&body, &self.rules).inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected definition");
        })?;

        let created = self.repository.insert(new_definition).await?;
        metrics::counter!("definitions_created_total").increment(1);
        tracing::info!(id = created.id, title = %created.title, "Created definition");

        Ok(Created::One(created))
    }

    /// Retrieves a definition by its exact title.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank title and
    /// [`AppError::NotFound`] if no definition has that title.
    pub async fn get_by_title(&self, raw_title: &str) -> Result<Definition, AppError> {
        let title = validate_get_by_title(raw_title)?;

        self.repository
            .find_by_title(&title)
            .await?
            .ok_or_else(|| AppError::not_found("Definition not found", json!({ "title": title })))
    }

    /// Retrieves a definition by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank or non-integer id and
    /// [`AppError::NotFound`] if the id does not exist.
    pub async fn get_by_id(&self, raw_id: &str) -> Result<Definition, AppError> {
        let id = validate_get_by_id(raw_id)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Definition not found", json!({ "id": id })))
    }

    /// Replaces a definition with the document in `body`.
    ///
    /// The target is the body's `id` when present, otherwise its `title`.
    /// The remaining fields are validated with the create rules.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid document or id,
    /// [`AppError::NotFound`] if the target does not exist and
    /// [`AppError::Conflict`] if the new title belongs to another definition.
    pub async fn replace(&self, body: Value) -> Result<Definition, AppError> {
        let Value::Object(mut object) = body else {
            return Err(ValidationError::Document(vec![FieldError::NotAnObject]).into());
        };

        let id = take_id(&mut object)?;
        let new_definition = validate_create(&Value::Object(object), &self.rules).inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected replacement");
        })?;

        let key = match id {
            Some(id) => DefinitionKey::Id(id),
            None => DefinitionKey::Title(new_definition.title.clone()),
        };

        let replaced = self
            .repository
            .replace(key.clone(), new_definition)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Definition not found", json!({ "key": key.to_string() }))
            })?;

        tracing::info!(id = replaced.id, "Replaced definition");
        Ok(replaced)
    }

    /// Deletes a definition by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank or non-integer id and
    /// [`AppError::NotFound`] if the id does not exist.
    pub async fn delete(&self, raw_id: &str) -> Result<(), AppError> {
        let id = validate_get_by_id(raw_id)?;

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Definition not found", json!({ "id": id })));
        }

        metrics::counter!("definitions_deleted_total").increment(1);
        tracing::info!(id, "Deleted definition");
        Ok(())
    }

    /// Deletes every id listed in a `{"ids": [...]}` body.
    ///
    /// Entries that are blank, not strings or not integers are skipped.
    /// Returns the number of definitions removed.
    pub async fn delete_many(&self, body: &Value) -> Result<u64, AppError> {
        let ids: Vec<i64> = validate_delete_definitions(body)
            .into_iter()
            .filter_map(|raw| match raw.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::debug!(id = %raw, "Skipping non-integer id");
                    None
                }
            })
            .collect();

        if ids.is_empty() {
            return Ok(0);
        }

        let deleted = self.repository.delete_many(ids).await?;
        metrics::counter!("definitions_deleted_total").increment(deleted);
        tracing::info!(deleted, "Bulk deleted definitions");

        Ok(deleted)
    }

    /// Checks that the store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

/// Removes and parses the `id` key of a replacement body.
fn take_id(object: &mut Map<String, Value>) -> Result<Option<i64>, ValidationError> {
    match object.remove("id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidId(n.to_string())),
        Some(Value::String(raw)) => validate_get_by_id(&raw).map(Some),
        Some(other) => Err(ValidationError::InvalidId(other.to_string())),
    }
}
