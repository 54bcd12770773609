//! Definition entity representing a dictionary entry (word or idiom).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How common a word or idiom is in everyday usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    #[default]
    Unknown,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Rarity::Common),
            "rare" => Ok(Rarity::Rare),
            "unknown" => Ok(Rarity::Unknown),
            other => Err(format!("unknown rarity '{other}'")),
        }
    }
}

/// Spoken form of a definition. Both parts are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronunciation {
    pub word: Option<String>,
    pub audio: Option<String>,
}

/// A stored dictionary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
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

/// Validated input for creating or replacing a definition.
///
/// Strings are already trimmed and defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDefinition {
    pub title: String,
    pub definition: String,
    pub category: String,
    pub part_of_speech: String,
    pub example_usage: String,
    pub rarity: Rarity,
    pub spelling_variations: Vec<String>,
    pub synonyms: Vec<String>,
    pub pronunciation: Pronunciation,
}

/// Identifies the definition targeted by a full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionKey {
    Id(i64),
    Title(String),
}

impl fmt::Display for DefinitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionKey::Id(id) => write!(f, "id {id}"),
            DefinitionKey::Title(title) => write!(f, "title '{title}'"),
        }
    }
}
