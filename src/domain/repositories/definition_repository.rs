//! Repository trait for definition data access.

use crate::domain::entities::{Definition, DefinitionKey, NewDefinition};
use crate::domain::query::Condition;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for dictionary definitions.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgDefinitionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_definition.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DefinitionRepository: Send + Sync {
    /// Counts definitions matching `condition` (all definitions when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self, condition: Option<Condition>) -> Result<i64, AppError>;

    /// Returns up to `limit` definitions matching `condition`, skipping the
    /// first `offset`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(
        &self,
        condition: Option<Condition>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Definition>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Definition>, AppError>;

    async fn find_by_title(&self, title: &str) -> Result<Option<Definition>, AppError>;

    /// Inserts a single definition.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the title is already taken.
    async fn insert(&self, new_definition: NewDefinition) -> Result<Definition, AppError>;

    /// Inserts all definitions in one statement.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if any title is already taken; nothing is inserted.
    async fn insert_many(
        &self,
        new_definitions: Vec<NewDefinition>,
    ) -> Result<Vec<Definition>, AppError>;

    /// Replaces every field of the definition identified by `key`.
    ///
    /// Returns `Ok(None)` if nothing matches.
    async fn replace(
        &self,
        key: DefinitionKey,
        new_definition: NewDefinition,
    ) -> Result<Option<Definition>, AppError>;

    /// Returns `Ok(true)` if a definition was deleted.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Deletes all listed ids and returns how many rows were removed.
    async fn delete_many(&self, ids: Vec<i64>) -> Result<u64, AppError>;

    /// Round-trips to the store.
    async fn ping(&self) -> Result<(), AppError>;
}
