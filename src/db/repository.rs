//! Repository trait and error types for the record store.

use async_trait::async_trait;

use crate::histogram::{Bin, FieldRange, GroupSpec, HistogramField, RecordFilter};
use crate::models::Contest;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    /// Connection-level failures; typically transient.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query evaluation failures.
    #[error("Query error: {0}")]
    Query(String),

    /// Requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Data failed validation before being stored.
    #[error("Data validation error: {0}")]
    Validation(String),

    /// Internal/unexpected errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether retrying the operation could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Read-side operations the histogram core needs from the record store,
/// plus the small read surfaces the HTTP layer exposes.
///
/// Implementations evaluate [`RecordFilter`] and [`GroupSpec`] against
/// their backing store; the core never sees rows, only aggregates.
#[async_trait]
pub trait WalkRepository: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Look up a contest by its identifier.
    async fn find_contest(&self, contest_id: &str) -> RepositoryResult<Option<Contest>>;

    /// All contests, most recent start date first.
    async fn list_contests(&self) -> RepositoryResult<Vec<Contest>>;

    /// Observed min/max of `field` over the filtered record set, or `None`
    /// when no records match.
    async fn field_range(
        &self,
        field: HistogramField,
        filter: &RecordFilter,
    ) -> RepositoryResult<Option<FieldRange>>;

    /// Grouped counts per bin, ascending by bin index. Bins with no
    /// matching records are omitted; the gap filler reinstates them.
    async fn grouped_counts(
        &self,
        field: HistogramField,
        filter: &RecordFilter,
        spec: &GroupSpec,
    ) -> RepositoryResult<Vec<Bin>>;
}
