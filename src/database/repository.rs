use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::movie::{Movie, MovieId, MoviePatch, NewMovie};

/// Row-set operations over the movies table.
///
/// Each call is a single statement. None of them checks for existence: callers
/// read "not found" off an empty result.
#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Movie>, DatabaseError>;

    async fn get_by_id(&self, id: MovieId) -> Result<Vec<Movie>, DatabaseError>;

    async fn insert(&self, movie: NewMovie) -> Result<Vec<Movie>, DatabaseError>;

    async fn update_partial(&self, id: MovieId, patch: MoviePatch) -> Result<Vec<Movie>, DatabaseError>;

    /// Returns the rows as they were just before deletion
    async fn delete_by_id(&self, id: MovieId) -> Result<Vec<Movie>, DatabaseError>;

    /// Cheap round trip used by the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Release every pooled connection (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Closed movie store pool");
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn list_all(&self) -> Result<Vec<Movie>, DatabaseError> {
        let rows = sqlx::query_as::<_, Movie>("SELECT * FROM movies ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: MovieId) -> Result<Vec<Movie>, DatabaseError> {
        let rows = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
            .bind(id.0)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, movie: NewMovie) -> Result<Vec<Movie>, DatabaseError> {
        let rows = sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (name, genre, rating, explicit)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(movie.name)
        .bind(movie.genre)
        .bind(movie.rating)
        .bind(movie.explicit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_partial(&self, id: MovieId, patch: MoviePatch) -> Result<Vec<Movie>, DatabaseError> {
        // NULL parameters fall back to the current column value
        let rows = sqlx::query_as::<_, Movie>(
            "UPDATE movies SET
                 name = COALESCE($2, name),
                 genre = COALESCE($3, genre),
                 rating = COALESCE($4, rating),
                 explicit = COALESCE($5, explicit)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id.0)
        .bind(patch.name)
        .bind(patch.genre)
        .bind(patch.rating)
        .bind(patch.explicit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_by_id(&self, id: MovieId) -> Result<Vec<Movie>, DatabaseError> {
        let rows = sqlx::query_as::<_, Movie>("DELETE FROM movies WHERE id = $1 RETURNING *")
            .bind(id.0)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
