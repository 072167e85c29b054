use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::movie::{Movie, MovieId, MoviePatch, NewMovie};
use crate::database::repository::MovieStore;

/// In-process movie store with the same row-set contract as the PostgreSQL
/// store. Ids come from a monotonic counter and are never reused.
#[derive(Default)]
pub struct MemoryMovieStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: BTreeMap<i32, Movie>,
}

impl MemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_movies(movies: impl IntoIterator<Item = NewMovie>) -> Self {
        let store = Self::new();
        for movie in movies {
            // Infallible for the memory store
            let _ = store.insert(movie).await;
        }
        store
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn list_all(&self) -> Result<Vec<Movie>, DatabaseError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: MovieId) -> Result<Vec<Movie>, DatabaseError> {
        Ok(self.inner.read().await.rows.get(&id.0).cloned().into_iter().collect())
    }

    async fn insert(&self, movie: NewMovie) -> Result<Vec<Movie>, DatabaseError> {
        let mut inner = self.inner.write().await;
        inner.next_id = inner
            .next_id
            .checked_add(1)
            .ok_or_else(|| DatabaseError::QueryError("id sequence exhausted".to_string()))?;

        let row = Movie::from_new(inner.next_id, movie);
        inner.rows.insert(row.id, row.clone());
        Ok(vec![row])
    }

    async fn update_partial(&self, id: MovieId, patch: MoviePatch) -> Result<Vec<Movie>, DatabaseError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .rows
            .get_mut(&id.0)
            .map(|row| {
                row.apply(&patch);
                row.clone()
            })
            .into_iter()
            .collect())
    }

    async fn delete_by_id(&self, id: MovieId) -> Result<Vec<Movie>, DatabaseError> {
        Ok(self.inner.write().await.rows.remove(&id.0).into_iter().collect())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
