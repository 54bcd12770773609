//! Handlers for the definition resource.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

use crate::api::dto::definition::{BulkDeleteResponse, CreatedResponse, DefinitionResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates one definition, or many when the body is an array.
///
/// # Endpoint
///
/// `POST /definitions`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Sheng",
///   "definition": "Swahili-English slang",
///   "category": "language",
///   "partOfSpeech": "noun",
///   "exampleUsage": "They spoke Sheng",
///   "rarity": "common",
///   "pronunciation": { "word": "sheng", "audio": null }
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if any document is invalid (per-field or per-index details)
/// - 409 Conflict if a title already exists
pub async fn create_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(body) = payload?;
    let created = state.definition_service.create(body).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Fetches a definition by its exact title.
///
/// # Endpoint
///
/// `GET /definitions/{title}`
///
/// # Errors
///
/// - 400 Bad Request for a blank title
/// - 404 Not Found
pub async fn get_by_title_handler(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<DefinitionResponse>, AppError> {
    let definition = state.definition_service.get_by_title(&title).await?;
    Ok(Json(definition.into()))
}

/// Fetches a definition by id.
///
/// # Endpoint
///
/// `GET /definitions/id/{id}`
///
/// # Errors
///
/// - 400 Bad Request for a blank or non-integer id
/// - 404 Not Found
pub async fn get_by_id_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DefinitionResponse>, AppError> {
    let definition = state.definition_service.get_by_id(&id).await?;
    Ok(Json(definition.into()))
}

/// Replaces a definition.
///
/// # Endpoint
///
/// `PUT /definitions`
///
/// The body is a full definition plus an optional `id`. Without `id` the
/// definition whose title equals the body's `title` is replaced.
///
/// # Errors
///
/// - 400 Bad Request for an invalid document or id
/// - 404 Not Found if the target does not exist
/// - 409 Conflict if the new title is taken by another definition
pub async fn replace_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DefinitionResponse>, AppError> {
    let Json(body) = payload?;
    let definition = state.definition_service.replace(body).await?;
    Ok(Json(definition.into()))
}

/// Deletes a definition by id.
///
/// # Endpoint
///
/// `DELETE /definitions/{id}`
///
/// # Response Codes
///
/// - **204 No Content**: Deleted
/// - **400 Bad Request**: Blank or non-integer id
/// - **404 Not Found**: No such definition
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.definition_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes several definitions at once.
///
/// # Endpoint
///
/// `POST /definitions/bulk/delete`
///
/// # Request Body
///
/// ```json
/// { "ids": ["1", "2"] }
/// ```
///
/// Unusable ids are skipped. The response reports how many were removed:
///
/// ```json
/// { "deletedCount": 2 }
/// ```
pub async fn bulk_delete_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BulkDeleteResponse>, AppError> {
    let Json(body) = payload?;
    let deleted_count = state.definition_service.delete_many(&body).await?;
    Ok(Json(BulkDeleteResponse { deleted_count }))
}
