//! Contest model and its date invariants.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A time-boxed contest period with a promo lead-in and an optional
/// baseline period prior to the contest start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    /// Contest identifier
    pub contest_id: String,
    /// Start of baseline period (prior to contest start)
    pub start_baseline: Option<NaiveDate>,
    /// Start date of promotion
    pub start_promo: NaiveDate,
    /// Contest start date
    pub start: NaiveDate,
    /// Contest end date
    pub end: NaiveDate,
}

impl Contest {
    /// Create a contest with a freshly generated identifier.
    pub fn new(
        start_baseline: Option<NaiveDate>,
        start_promo: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            contest_id: Uuid::new_v4().to_string(),
            start_baseline,
            start_promo,
            start,
            end,
        }
    }

    /// Validate the ordering invariants between baseline, promo, start and end.
    pub fn validate_dates(&self) -> Result<(), String> {
        if self.start < self.start_promo {
            return Err("Promotion must start before or at same time as Start".to_string());
        }
        if let Some(baseline) = self.start_baseline {
            if baseline >= self.start {
                return Err("Baseline period must begin before contest start".to_string());
            }
        }
        if self.end <= self.start {
            return Err("End of contest must be after Start".to_string());
        }
        Ok(())
    }

    /// The date window used when deriving contest membership for person
    /// records: anchored at the baseline start when one exists, else the
    /// contest start.
    pub fn histogram_window(&self) -> (NaiveDate, NaiveDate) {
        (self.start_baseline.unwrap_or(self.start), self.end)
    }

    /// Whether this contest's promo-to-end period intersects another's.
    pub fn overlaps(&self, other: &Contest) -> bool {
        self.start_promo <= other.end && other.start_promo <= self.end
    }
}
