//! List query parameters and paginated responses.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_with::{DefaultOnError, DeserializeAs, serde_as};

use crate::api::dto::definition::DefinitionResponse;
use crate::application::services::{ListQuery, Page, PageInfo};

/// Reads the leading integer of a string: `"10abc"` is 10, `"1.5"` is 1.
/// Leading whitespace and one sign are allowed.
struct LeadingInteger;

impl<'de> DeserializeAs<'de, i64> for LeadingInteger {
    fn deserialize_as<D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_leading_integer(&raw)
            .ok_or_else(|| de::Error::custom(format!("`{raw}` does not start with an integer")))
    }
}

fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len() - sign_len);

    if digits_len == 0 {
        return None;
    }
    trimmed[..sign_len + digits_len].parse().ok()
}

/// Query string of `GET /definitions`.
///
/// `page` and `limit` keep only their leading integer; values without one
/// are treated as absent, so the defaults apply instead of a rejection.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueryParams {
    #[serde_as(as = "DefaultOnError<Option<LeadingInteger>>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "DefaultOnError<Option<LeadingInteger>>")]
    #[serde(default)]
    pub limit: Option<i64>,

    pub comparator: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub search: Option<String>,
}

impl From<ListQueryParams> for ListQuery {
    fn from(p: ListQueryParams) -> Self {
        Self {
            page: p.page,
            limit: p.limit,
            comparator: p.comparator,
            created_at: p.created_at,
            updated_at: p.updated_at,
            search: p.search,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageInfoResponse {
    pub limit: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub count: i64,
    pub pages: i64,
}

impl From<PageInfo> for PageInfoResponse {
    fn from(info: PageInfo) -> Self {
        Self {
            limit: info.limit,
            next: info.next,
            previous: info.previous,
            count: info.count,
            pages: info.pages,
        }
    }
}

/// Paginated list of definitions.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub info: PageInfoResponse,
    pub results: Vec<DefinitionResponse>,
}

impl From<Page> for ListResponse {
    fn from(page: Page) -> Self {
        Self {
            info: page.info.into(),
            results: page.results.into_iter().map(Into::into).collect(),
        }
    }
}
