//! Business logic services for the application layer.

pub mod definition_service;
pub mod pagination_service;

pub use definition_service::{Created, DefinitionService};
pub use pagination_service::{ListQuery, ListSettings, Page, PageInfo, PaginationService};
