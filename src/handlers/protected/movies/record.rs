use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde_json::Value;

use crate::database::{Movie, MoviePatch};
use crate::middleware::ApiResult;
use crate::state::AppState;

use super::utils::{found_or_404, json_body, movie_id};

/// GET /movies/:id - Get a single movie by id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Vec<Movie>> {
    let id = movie_id(path)?;
    found_or_404(state.store.get_by_id(id).await?)
}

/// PUT /movies/:id - Merge the supplied fields into a movie
///
/// Any subset of fields is accepted. The store does not fail on an update
/// that matches nothing, so a missing movie shows up as an empty row set.
pub async fn put(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Vec<Movie>> {
    let id = movie_id(path)?;
    let patch = MoviePatch::from_json(json_body(payload)?)?;
    found_or_404(state.store.update_partial(id, patch).await?)
}

/// DELETE /movies/:id - Delete a movie, returning the row as it was
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Vec<Movie>> {
    let id = movie_id(path)?;
    let response = found_or_404(state.store.delete_by_id(id).await?)?;
    tracing::info!(id = id.0, "Deleted movie");
    Ok(response)
}
