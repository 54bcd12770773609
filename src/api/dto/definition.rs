//! DTOs for the definition resource.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::Created;
use crate::domain::entities::{Definition, Pronunciation, Rarity};

/// A stored definition as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionResponse {
    pub id: i64,
    pub title: String,
    pub definition: String,
    pub category: String,
    pub part_of_speech: String,
    pub example_usage: String,
    pub rarity: Rarity,
    pub spelling_variations: Vec<String>,
    pub synonyms: Vec<String>,
    pub pronunciation: Pronunciation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Definition> for DefinitionResponse {
    fn from(d: Definition) -> Self {
        Self {
            id: d.id,
            title: d.title,
            definition: d.definition,
            category: d.category,
            part_of_speech: d.part_of_speech,
            example_usage: d.example_usage,
            rarity: d.rarity,
            spelling_variations: d.spelling_variations,
            synonyms: d.synonyms,
            pronunciation: d.pronunciation,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Body of a successful create: mirrors the request shape.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreatedResponse {
    One(DefinitionResponse),
    Many(Vec<DefinitionResponse>),
}

impl From<Created> for CreatedResponse {
    fn from(created: Created) -> Self {
        match created {
            Created::One(d) => CreatedResponse::One(d.into()),
            Created::Many(defs) => CreatedResponse::Many(defs.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub deleted_count: u64,
}
