pub mod movie;

pub use movie::{Movie, MovieError, MovieId, MoviePatch, NewMovie};
