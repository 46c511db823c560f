//! Participation-event records: daily aggregates and recorded walks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::AccountId;

/// A per-day step/distance aggregate reported by a device. Keyed by a
/// plain date column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWalk {
    pub account_id: AccountId,
    pub date: NaiveDate,
    pub steps: i64,
    /// Distance in miles.
    pub distance: f64,
}

/// A discrete recorded walk with explicit start and end timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentionalWalk {
    pub account_id: AccountId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub steps: i64,
    /// Distance in miles.
    pub distance: f64,
}
