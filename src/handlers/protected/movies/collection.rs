use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::database::{Lookup, Movie, NewMovie};
use crate::error::{ApiError, GENERIC_FAILURE};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::json_body;

/// GET /movies - List every movie
pub async fn get(State(state): State<AppState>) -> ApiResult<Vec<Movie>> {
    let movies = state.store.list_all().await?;
    Ok(ApiResponse::success(movies))
}

/// POST /movies - Create a movie from a complete payload
///
/// Validation runs before the store is touched; an incomplete payload is a
/// 400 and nothing is written.
pub async fn post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Vec<Movie>> {
    let movie = NewMovie::from_json(json_body(payload)?)?;

    match Lookup::from_rows(state.store.insert(movie).await?) {
        Lookup::Found(created) => {
            tracing::info!(id = created.id, "Created movie");
            Ok(ApiResponse::created(vec![created]))
        }
        Lookup::NotFound => {
            tracing::error!("Insert returned no rows");
            Err(ApiError::internal_server_error(GENERIC_FAILURE))
        }
    }
}
