//! Histogram binning core.
//!
//! Three cooperating pieces turn a raw histogram request into a dense,
//! gapless bin list:
//!
//! - [`request`]: parses and validates the request parameters (field
//!   whitelist per record kind, exactly one binning strategy, mutually
//!   exclusive filters).
//! - [`planner`]: resolves the record filter for the requested kind and
//!   computes bin boundaries for the fixed-count, fixed-size and custom
//!   breakpoint strategies, producing a grouped-count query specification.
//! - [`filler`]: expands the sparse grouped counts the store returns into
//!   a complete bin sequence, injecting zero-count fillers (SQL `GROUP BY`
//!   never emits empty groups, so gap filling runs as a post-process).
//!
//! The core is pure and read-only: it owns no persistence and issues no
//! queries itself. The service layer feeds it aggregate results from a
//! [`crate::db::WalkRepository`].

pub mod error;
pub mod filler;
pub mod planner;
pub mod request;

pub use error::{ErrorMap, HistogramError, NON_FIELD_ERRORS};
pub use filler::{fill_missing_bins, Bin, DenseBins};
pub use planner::{
    plan_bins, resolve_filter, EchoParam, FieldRange, FilterScope, GroupSpec, HistogramPlan,
    RecordFilter,
};
pub use request::{BinStrategy, HistogramField, HistogramQuery, HistogramRequest, RecordKind};
