//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::DefinitionRepository`]
//! trait, run the boundary validators and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::definition_service::DefinitionService`] - Create, fetch, replace and delete
//! - [`services::pagination_service::PaginationService`] - Filtered, paginated listing

pub mod services;
