use crate::database::manager::DatabaseError;
use crate::database::models::movie::{Movie, NewMovie};
use crate::database::repository::MovieStore;

/// Starter catalog used by `movies-api seed` and the in-memory serve mode
pub fn sample_movies() -> Vec<NewMovie> {
    vec![
        NewMovie::new("The Land Before Time", "Fantasy", 7.0, false),
        NewMovie::new("Jurassic Park", "Science Fiction", 9.0, true),
        NewMovie::new("Ice Age: Dawn of the Dinosaurs", "Action/Romance", 5.0, false),
    ]
}

/// Insert the sample movies, returning the stored rows
pub async fn seed(store: &dyn MovieStore) -> Result<Vec<Movie>, DatabaseError> {
    let mut inserted = Vec::new();
    for movie in sample_movies() {
        inserted.extend(store.insert(movie).await?);
    }
    tracing::info!("Seeded {} movies", inserted.len());
    Ok(inserted)
}
