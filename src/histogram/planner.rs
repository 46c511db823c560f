//! Bin planning: filter resolution and boundary computation.
//!
//! Given a validated [`HistogramRequest`] and the observed value range of
//! the target field, the planner produces a [`GroupSpec`] describing the
//! grouped-count query plus the advisory bin total the gap filler uses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::HistogramError;
use super::request::{BinStrategy, HistogramRequest, RecordKind};
use crate::models::Contest;

/// Observed min/max of the target field over the filtered record set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRange {
    pub lower: f64,
    pub upper: f64,
}

/// How the record set is narrowed before aggregation.
///
/// Date semantics differ per record kind, so the request's contest/date
/// parameters are normalized into one of these shapes up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterScope {
    /// Participation events within an inclusive date window. Date-keyed
    /// records compare their date column; timestamp-keyed records require
    /// both start and end to fall inside the window.
    Dates {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// Leaderboard rows belonging to one contest.
    Contest { contest_id: String },
    /// Person records owning any participation event (of either kind)
    /// inside the window.
    Membership {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

/// A normalized, kind-aware record filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub kind: RecordKind,
    pub scope: FilterScope,
    pub is_tester: bool,
}

/// Normalize the request's contest/date parameters into a [`RecordFilter`]
/// for its record kind.
///
/// `contest` must be the resolved contest when the request carried a
/// `contest_id`; reference resolution happens in the service layer so this
/// stays a pure function.
pub fn resolve_filter(
    request: &HistogramRequest,
    contest: Option<&Contest>,
) -> Result<RecordFilter, HistogramError> {
    let scope = match request.kind {
        RecordKind::Leaderboard => {
            let Some(contest) = contest else {
                return Err(HistogramError::field(
                    "contest_id",
                    "contest_id is required for the leaderboard record kind.",
                ));
            };
            if request.start_date.is_some() || request.end_date.is_some() {
                return Err(HistogramError::non_field(
                    "start_date and end_date are not supported for the leaderboard record kind.",
                ));
            }
            FilterScope::Contest {
                contest_id: contest.contest_id.clone(),
            }
        }
        RecordKind::Account => match contest {
            // Membership is derived from participation events inside the
            // contest window, anchored at the baseline start when present.
            Some(contest) => {
                let (start, end) = contest.histogram_window();
                FilterScope::Membership {
                    start: Some(start),
                    end: Some(end),
                }
            }
            None => FilterScope::Membership {
                start: request.start_date,
                end: request.end_date,
            },
        },
        RecordKind::DailyWalk | RecordKind::IntentionalWalk => match contest {
            Some(contest) => FilterScope::Dates {
                start: Some(contest.start),
                end: Some(contest.end),
            },
            None => FilterScope::Dates {
                start: request.start_date,
                end: request.end_date,
            },
        },
    };

    Ok(RecordFilter {
        kind: request.kind,
        scope,
        is_tester: request.is_tester,
    })
}

/// Specification for the grouped-count query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSpec {
    /// Group matching records by `floor(field / bin_size)`.
    Even { bin_size: i64 },
    /// Classify each record into the first breakpoint interval
    /// `[breaks[i], breaks[i + 1])` containing its value, else the final
    /// open-ended bin. `upper` is the observed maximum, reported as the
    /// final populated bin's end.
    Custom { breaks: Vec<i64>, upper: i64 },
}

/// The strategy parameter echoed back in the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EchoParam {
    Size(i64),
    Count(i64),
    Custom(Vec<i64>),
}

impl EchoParam {
    /// The echo for the empty-result short circuit: whichever parameter the
    /// request supplied, unchanged.
    pub fn from_strategy(strategy: &BinStrategy) -> Self {
        match strategy {
            BinStrategy::Size(size) => Self::Size(*size),
            BinStrategy::Count(count) => Self::Count(*count),
            BinStrategy::Custom(breaks) => Self::Custom(breaks.clone()),
        }
    }
}

/// The computed bin boundary set for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramPlan {
    pub spec: GroupSpec,
    /// Advisory bin total for gap filling. For the fixed-size strategy a
    /// record at the observed maximum may land one bin past this; the
    /// filler tolerates that.
    pub total_bins: usize,
    pub echo: EchoParam,
}

/// Compute concrete bin boundaries from the strategy and the observed
/// field range.
pub fn plan_bins(strategy: &BinStrategy, range: &FieldRange) -> HistogramPlan {
    match strategy {
        BinStrategy::Count(count) => {
            // Divide the 0-to-upper span by (count - 1), not count: naive
            // division yields count + 1 edges. Data from 0 to 11 split in
            // two gets bin_size 5 and bins 0-5, 5-10, 10-15 to capture
            // the 11. Clamped to 1 for ranges narrower than the requested
            // count, which collapses everything into fewer, wider bins.
            let upper = range.upper.floor() as i64;
            let bin_size = (upper / (count - 1)).max(1);
            HistogramPlan {
                spec: GroupSpec::Even { bin_size },
                total_bins: *count as usize,
                echo: EchoParam::Size(bin_size),
            }
        }
        BinStrategy::Size(size) => {
            let total = ((range.upper - range.lower) / *size as f64).floor() as i64;
            HistogramPlan {
                spec: GroupSpec::Even { bin_size: *size },
                total_bins: total.max(0) as usize,
                echo: EchoParam::Size(*size),
            }
        }
        BinStrategy::Custom(breaks) => HistogramPlan {
            spec: GroupSpec::Custom {
                breaks: breaks.clone(),
                upper: range.upper.floor() as i64,
            },
            total_bins: breaks.len(),
            echo: EchoParam::Custom(breaks.clone()),
        },
    }
}
