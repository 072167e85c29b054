pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the full HTTP surface over the given state
pub fn app(state: AppState) -> Router {
    use handlers::public;

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/auth/logout", post(public::logout_post))
        // Session required
        .merge(movie_routes(state.clone()))
        .merge(auth_routes(state.clone()))
        .fallback(public::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn movie_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::movies;

    Router::new()
        .route("/movies", get(movies::collection_get).post(movies::collection_post))
        .route(
            "/movies/:id",
            get(movies::record_get)
                .put(movies::record_put)
                .delete(movies::record_delete),
        )
        .route_layer(from_fn_with_state(state, middleware::require_session))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/auth/status", get(auth::session_status))
        .route_layer(from_fn_with_state(state, middleware::require_session))
}
