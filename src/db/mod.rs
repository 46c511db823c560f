//! Database module for the walking-contest record store.
//!
//! Access goes through the Repository pattern so storage backends can be
//! swapped without touching the histogram core or the HTTP layer:
//!
//! - `repository`: the [`WalkRepository`] trait and error types.
//! - `repositories::local`: in-memory implementation for unit testing and
//!   local development.
//!
//! A process-wide repository singleton is initialized once via
//! [`init_repository`] and shared through [`get_repository`].

pub mod repositories;
pub mod repository;

pub use repositories::LocalRepository;
pub use repository::{RepositoryError, RepositoryResult, WalkRepository};

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn WalkRepository>> = OnceLock::new();

/// Initialize the global repository singleton.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo: Arc<dyn WalkRepository> = Arc::new(LocalRepository::new());
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn WalkRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Database not initialized. Call init_repository() first.")
}
