//! Repository trait definitions for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.

pub mod definition_repository;

pub use definition_repository::DefinitionRepository;

#[cfg(test)]
pub use definition_repository::MockDefinitionRepository;
