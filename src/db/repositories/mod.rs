//! Repository implementations module.
//!
//! Currently a single backend: the in-memory `local` implementation used
//! for unit testing and local development.

pub mod local;

pub use local::LocalRepository;
