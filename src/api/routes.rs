//! API route configuration.

use crate::api::handlers::{
    bulk_delete_handler, create_handler, delete_handler, get_by_id_handler, get_by_title_handler,
    list_handler, replace_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes of the definition resource, mounted under `/definitions`.
///
/// # Endpoints
///
/// - `GET    /`              - Paginated, filtered list
/// - `POST   /`              - Create one or many definitions
/// - `PUT    /`              - Replace a definition (keyed by `id` or `title`)
/// - `POST   /bulk/delete`   - Delete several definitions
/// - `GET    /id/{id}`       - Fetch by id
/// - `GET    /{title}`       - Fetch by title
/// - `DELETE /{id}`          - Delete one definition
pub fn definition_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_handler).post(create_handler).put(replace_handler),
        )
        .route("/bulk/delete", post(bulk_delete_handler))
        .route("/id/{id}", get(get_by_id_handler))
        .route(
            "/{title_or_id}",
            get(get_by_title_handler).delete(delete_handler),
        )
}
