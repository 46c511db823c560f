//! High-level business logic services.
//!
//! Services orchestrate repository queries with the pure histogram core
//! and work against any [`crate::db::WalkRepository`] implementation.

pub mod histogram;

pub use histogram::{histogram, HistogramResult, ServiceError};
