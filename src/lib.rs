//! # Walkstats Backend
//!
//! Admin analytics backend for a community step-counting program.
//!
//! This crate aggregates walking activity (daily pedometer readings,
//! recorded walks, contest leaderboards, participant accounts) into
//! histograms served over a REST API. A histogram request names a record
//! kind and a numeric field; the service validates the query, resolves
//! the date or contest filter, plans the bin layout, fetches sparse
//! grouped counts from the repository, and fills the gaps so clients
//! always receive a dense, contiguous series.
//!
//! ## Architecture
//!
//! - [`models`]: Domain types (contests, accounts, walk records)
//! - [`db`]: Repository trait and the in-memory record store
//! - [`histogram`]: Request validation, bin planning and gap filling
//! - [`services`]: The histogram pipeline tying the layers together
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod db;
pub mod histogram;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
