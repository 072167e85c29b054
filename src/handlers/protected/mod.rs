// handlers/protected/mod.rs - Protected handlers (session required)
//
// Every route in this tier sits behind `middleware::require_session`, so each
// handler may assume an `AuthSession` is present in the request extensions.

pub mod auth;
pub mod movies;

pub use auth::*;
pub use movies::*;
