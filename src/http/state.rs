//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::WalkRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for record-store operations
    pub repository: Arc<dyn WalkRepository>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn WalkRepository>) -> Self {
        Self { repository }
    }
}
