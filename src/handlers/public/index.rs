use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET / - Greeting
pub async fn root() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "hello, world!"
    }))
}

/// GET /health - Report whether the movie store answers
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": [{
                    "timestamp": now,
                    "database": "ok"
                }]
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            let error = ApiError::service_unavailable("database unavailable");
            (error.status_code(), Json(error.to_json()))
        }
    }
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found.")
}
