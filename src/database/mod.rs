pub mod fixtures;
pub mod lookup;
pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use lookup::Lookup;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryMovieStore;
pub use models::{Movie, MovieError, MovieId, MoviePatch, NewMovie};
pub use repository::{MovieStore, PgMovieStore};
