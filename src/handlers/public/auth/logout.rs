use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::error::{ApiError, GENERIC_FAILURE};
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// POST /auth/logout - Expire the session cookie
///
/// Tokens are stateless, so this only tells the client to forget its cookie.
pub async fn logout_post(State(state): State<AppState>) -> Response {
    let cookie = format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
        state.sessions.cookie_name()
    );

    let Ok(cookie) = HeaderValue::from_str(&cookie) else {
        tracing::error!("Session cookie name is not a valid header value");
        return ApiError::internal_server_error(GENERIC_FAILURE).into_response();
    };

    let mut response = ApiResponse::success(Vec::<()>::new()).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    response
}
