//! Handler for the paginated definition list.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::api::dto::pagination::{ListQueryParams, ListResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists definitions with pagination, timestamp filtering and title search.
///
/// # Endpoint
///
/// `GET /definitions`
///
/// # Query Parameters
///
/// - `page` - 1-based page number (default 1)
/// - `limit` - page size (default and maximum are configurable)
/// - `comparator` - `gt`, `gte`, `lt`, `lte` or `eq`
/// - `createdAt` / `updatedAt` - ISO 8601 date or date-time; `createdAt` wins
/// - `search` - case-insensitive regular expression matched against titles
///
/// # Response
///
/// ```json
/// {
///   "info": { "limit": 500, "next": null, "previous": null, "count": 2, "pages": 1 },
///   "results": [ ... ]
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request with `Invalid input` if a comparator or date was given
///   but none of them is valid
/// - 400 Bad Request for an invalid search pattern
/// - 400 Bad Request for a query string that cannot be decoded, such as a
///   repeated parameter
pub async fn list_handler(
    State(state): State<AppState>,
    params: Result<Query<ListQueryParams>, QueryRejection>,
) -> Result<Json<ListResponse>, AppError> {
    let Query(params) = params?;
    let page = state.pagination_service.list(params.into()).await?;
    Ok(Json(page.into()))
}
