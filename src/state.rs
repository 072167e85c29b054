use std::sync::Arc;

use crate::auth::SessionKeys;
use crate::database::MovieStore;

/// Shared per-process state handed to every handler.
///
/// Holds no request data; the store is built at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MovieStore>,
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn MovieStore>, sessions: SessionKeys) -> Self {
        Self { store, sessions }
    }
}
