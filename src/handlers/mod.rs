// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (session gate)
pub mod public;
pub mod protected;
