use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::CorsLayer;

use crate::auth::SessionKeys;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{fixtures, DatabaseManager, MemoryMovieStore, PgMovieStore};
use crate::state::AppState;

pub async fn handle(config: &AppConfig, memory: bool) -> anyhow::Result<()> {
    if config.session.secret.is_empty() {
        anyhow::bail!("SESSION_SECRET must be set in {:?}", config.environment);
    }
    let sessions = SessionKeys::from_config(&config.session);

    if memory {
        tracing::warn!("Serving from an in-memory store; data is lost on exit");
        let store = MemoryMovieStore::with_movies(fixtures::sample_movies()).await;
        return serve(config, AppState::new(Arc::new(store), sessions)).await;
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::ensure_schema(&pool).await?;

    let store = Arc::new(PgMovieStore::new(pool));
    let result = serve(config, AppState::new(store.clone(), sessions)).await;
    store.close().await;
    result
}

async fn serve(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let mut app = crate::app(state);
    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security));
    }

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
