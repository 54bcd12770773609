//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Dynamic
//! filters are built with `sqlx::QueryBuilder` and bound parameters.

pub mod pg_definition_repository;

pub use pg_definition_repository::PgDefinitionRepository;
