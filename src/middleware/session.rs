use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{AuthSession, Claims, SessionError, SessionKeys};
use crate::error::ApiError;
use crate::state::AppState;

/// Session gate for protected routes.
///
/// Accepts a signed session token from the session cookie or an
/// `Authorization: Bearer` header and injects the [`AuthSession`] into the
/// request. Anonymous requests never reach the handler.
///
/// The cookie is checked first; a cookie that fails verification does not
/// shadow a valid bearer token.
pub async fn require_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&headers, &state.sessions) {
        Ok(claims) => {
            let session = AuthSession::from(claims);
            tracing::debug!(user = %session.user, session_id = %session.session_id, "session accepted");
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Verify each presented token in turn, reporting the last failure
fn authenticate(headers: &HeaderMap, keys: &SessionKeys) -> Result<Claims, SessionError> {
    let mut result = Err(SessionError::Missing);
    for token in candidate_tokens(headers, keys.cookie_name()) {
        result = keys.verify(&token);
        if result.is_ok() {
            break;
        }
    }
    result
}

/// Session tokens in the order they are tried: cookie, then bearer
fn candidate_tokens(headers: &HeaderMap, cookie_name: &str) -> Vec<String> {
    token_from_cookies(headers, cookie_name)
        .into_iter()
        .chain(token_from_bearer(headers))
        .collect()
}

fn token_from_cookies(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn token_from_bearer(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
