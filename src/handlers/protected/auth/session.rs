use axum::Extension;

use crate::auth::AuthSession;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /auth/status - Describe the session the request was admitted with
pub async fn status(Extension(session): Extension<AuthSession>) -> ApiResult<Vec<AuthSession>> {
    Ok(ApiResponse::success(vec![session]))
}
