// handlers/public/mod.rs - Public handlers (no session required)

pub mod auth;
pub mod index;

pub use auth::*;
pub use index::{health, not_found, root};
