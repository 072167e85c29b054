use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    Json,
};
use serde_json::Value;

use crate::database::{Lookup, Movie, MovieId};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// Unwrap a JSON body, turning extractor rejections into error envelopes
pub fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(e)) => Err(ApiError::bad_request(e.body_text())),
        Err(e) => Err(ApiError::invalid_json(e.body_text())),
    }
}

/// Coerce a path segment to an id; unusable input reads as a missing movie.
/// That includes segments that do not percent-decode to UTF-8.
pub fn movie_id(path: Result<Path<String>, PathRejection>) -> Result<MovieId, ApiError> {
    let raw = match path {
        Ok(Path(raw)) => raw,
        Err(e) => {
            tracing::debug!("Path id rejected: {}", e.body_text());
            return Err(ApiError::movie_not_found());
        }
    };

    MovieId::parse(&raw).ok_or_else(|| {
        tracing::debug!("Path id {:?} is not an integer", raw);
        ApiError::movie_not_found()
    })
}

/// Map a keyed statement's row set to `200 [row]` or the not-found envelope
pub fn found_or_404(rows: Vec<Movie>) -> ApiResult<Vec<Movie>> {
    match Lookup::from_rows(rows) {
        Lookup::Found(movie) => Ok(ApiResponse::success(vec![movie])),
        Lookup::NotFound => Err(ApiError::movie_not_found()),
    }
}
