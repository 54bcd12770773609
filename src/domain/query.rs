//! Filter conditions for listing definitions.
//!
//! A [`Condition`] is a small tree of timestamp comparisons and title matches
//! joined by explicit conjunction ([`Condition::All`]) or disjunction
//! ([`Condition::Any`]). Repositories translate it into their own query
//! language; the domain layer only decides which parts exist and how they
//! combine.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Comparison applied to a timestamp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

impl Comparator {
    /// Parses a comparator name, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gt" => Some(Comparator::Gt),
            "gte" => Some(Comparator::Gte),
            "lt" => Some(Comparator::Lt),
            "lte" => Some(Comparator::Lte),
            "eq" => Some(Comparator::Eq),
            _ => None,
        }
    }

    pub fn sql_operator(&self) -> &'static str {
        match self {
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Eq => "=",
        }
    }

    /// Evaluates `left <op> right`.
    pub fn compare<T: PartialOrd>(&self, left: &T, right: &T) -> bool {
        match self {
            Comparator::Gt => left > right,
            Comparator::Gte => left >= right,
            Comparator::Lt => left < right,
            Comparator::Lte => left <= right,
            Comparator::Eq => left == right,
        }
    }
}

/// Timestamp columns that support range filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    CreatedAt,
    UpdatedAt,
}

impl TimestampField {
    pub fn column(&self) -> &'static str {
        match self {
            TimestampField::CreatedAt => "created_at",
            TimestampField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Timestamp {
        field: TimestampField,
        comparator: Comparator,
        value: DateTime<Utc>,
    },
    /// Case-insensitive regular expression match against the title.
    TitleMatches(String),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

/// How the timestamp filter and the title search are joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterCombination {
    /// Documents must satisfy every filter.
    #[default]
    And,
    /// Documents may satisfy any filter.
    Or,
}

impl FromStr for FilterCombination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(FilterCombination::And),
            "or" => Ok(FilterCombination::Or),
            other => Err(format!("expected 'and' or 'or', got '{other}'")),
        }
    }
}

impl fmt::Display for FilterCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterCombination::And => f.write_str("and"),
            FilterCombination::Or => f.write_str("or"),
        }
    }
}

/// Collects filter parts and joins them with a [`FilterCombination`].
#[derive(Debug, Clone)]
pub struct ConditionBuilder {
    combination: FilterCombination,
    parts: Vec<Condition>,
}

impl ConditionBuilder {
    pub fn new(combination: FilterCombination) -> Self {
        Self {
            combination,
            parts: Vec::new(),
        }
    }

    pub fn with_timestamp(
        mut self,
        field: TimestampField,
        comparator: Comparator,
        value: DateTime<Utc>,
    ) -> Self {
        self.parts.push(Condition::Timestamp {
            field,
            comparator,
            value,
        });
        self
    }

    pub fn with_title_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.parts.push(Condition::TitleMatches(pattern.into()));
        self
    }

    /// Returns `None` when no filter part was added.
    pub fn build(mut self) -> Option<Condition> {
        match self.parts.len() {
            0 => None,
            1 => self.parts.pop(),
            _ => Some(match self.combination {
                FilterCombination::And => Condition::All(self.parts),
                FilterCombination::Or => Condition::Any(self.parts),
            }),
        }
    }
}
