use anyhow::Context;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::AppConfig;
use crate::database::{fixtures, DatabaseManager, PgMovieStore};

pub async fn init(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::ensure_schema(&pool).await?;
    pool.close().await;

    output_success(&output_format, "movies table is ready", None)
}

pub async fn seed(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::ensure_schema(&pool).await?;

    let store = PgMovieStore::new(pool);
    let rows = fixtures::seed(&store).await;
    store.close().await;
    let rows = rows?;

    output_success(
        &output_format,
        &format!("Inserted {} movies", rows.len()),
        Some(serde_json::to_value(&rows)?),
    )
}
