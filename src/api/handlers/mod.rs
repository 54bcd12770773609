//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod definitions;
pub mod health;
pub mod list;

pub use definitions::{
    bulk_delete_handler, create_handler, delete_handler, get_by_id_handler, get_by_title_handler,
    replace_handler,
};
pub use health::health_handler;
pub use list::list_handler;
