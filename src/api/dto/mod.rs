//! Data Transfer Objects for API requests and responses.
//!
//! Request bodies of the definition resource are taken as raw JSON and
//! validated by [`crate::validation`]; only query strings and responses have
//! dedicated types here.

pub mod definition;
pub mod health;
pub mod pagination;
