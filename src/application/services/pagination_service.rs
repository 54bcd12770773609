//! Paginated, filtered listing of definitions.

use std::sync::Arc;

use crate::domain::entities::Definition;
use crate::domain::query::{ConditionBuilder, FilterCombination, TimestampField};
use crate::domain::repositories::DefinitionRepository;
use crate::error::AppError;
use crate::validation::{ValidationError, validate_comparator, validate_date_time, validate_search};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 500;
pub const DEFAULT_MAX_LIMIT: i64 = 1000;

/// Raw list parameters as supplied by the caller.
///
/// `page` and `limit` are `None` when absent or unparsable.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub comparator: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub search: Option<String>,
}

/// Tunables for the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    pub default_limit: i64,
    pub max_limit: i64,
    pub combination: FilterCombination,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            combination: FilterCombination::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub limit: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub count: i64,
    pub pages: i64,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub info: PageInfo,
    pub results: Vec<Definition>,
}

/// Service computing pagination windows and filter conditions.
///
/// `next`/`previous` are derived from the unfiltered collection size; when a
/// filter matches nothing both are cleared. `count` and `pages` always
/// describe the filtered set.
pub struct PaginationService {
    repository: Arc<dyn DefinitionRepository>,
    settings: ListSettings,
}

impl PaginationService {
    /// Creates a new pagination service.
    pub fn new(repository: Arc<dyn DefinitionRepository>, settings: ListSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> ListSettings {
        self.settings
    }

    /// Lists one page of definitions.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with message `Invalid input` when a
    /// comparator or timestamp was supplied but none of them is valid, or
    /// when the search pattern is not a valid regular expression.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(&self, query: ListQuery) -> Result<Page, AppError> {
        metrics::counter!("definitions_list_requests_total").increment(1);

        let page = positive_or(query.page, DEFAULT_PAGE);
        let limit = positive_or(query.limit, self.settings.default_limit).min(self.settings.max_limit);

        let jointly_empty =
            query.comparator.is_none() && query.created_at.is_none() && query.updated_at.is_none();

        let comparator = query.comparator.as_deref().and_then(validate_comparator);
        let created_at = query.created_at.as_deref().and_then(validate_date_time);
        let updated_at = query.updated_at.as_deref().and_then(validate_date_time);

        if !jointly_empty && comparator.is_none() && created_at.is_none() && updated_at.is_none() {
            tracing::debug!(?query, "Rejected list filter without a usable comparator or date");
            return Err(ValidationError::InvalidInput.into());
        }

        let search = match query.search.as_deref() {
            Some(raw) => validate_search(raw)?,
            None => None,
        };

        let start_index = (page - 1).saturating_mul(limit);
        let end_index = page.saturating_mul(limit);

        let total = self.repository.count(None).await?;
        let mut next = page.checked_add(1).filter(|_| end_index < total);
        let mut previous = (start_index > 0).then(|| page - 1);

        let timestamp = match (created_at, updated_at) {
            (Some(value), _) => Some((TimestampField::CreatedAt, value)),
            (None, Some(value)) => Some((TimestampField::UpdatedAt, value)),
            (None, None) => None,
        };

        let mut builder = ConditionBuilder::new(self.settings.combination);
        if let (Some(comparator), Some((field, value))) = (comparator, timestamp) {
            builder = builder.with_timestamp(field, comparator, value);
        }
        if let Some(pattern) = search {
            builder = builder.with_title_pattern(pattern);
        }
        let condition = builder.build();

        let mut count = total;
        if condition.is_some() {
            count = self.repository.count(condition.clone()).await?;
            if count == 0 {
                next = None;
                previous = None;
            }
        }

        let results = self.repository.find(condition, limit, start_index).await?;

        Ok(Page {
            info: PageInfo {
                limit,
                next,
                previous,
                count,
                pages: page_count(count, limit),
            },
            results,
        })
    }
}

fn positive_or(value: Option<i64>, default: i64) -> i64 {
    value.filter(|v| *v > 0).unwrap_or(default)
}

fn page_count(count: i64, limit: i64) -> i64 {
    if count <= 0 {
        return 0;
    }
    (count - 1) / limit + 1
}
