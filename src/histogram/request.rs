//! Histogram request parameters and validation.
//!
//! Parameters arrive as raw query strings and are parsed here so every
//! failure can be reported under the offending parameter's name rather
//! than as an opaque deserialization error.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::HistogramError;

/// The logical record type a histogram is computed over.
///
/// Each kind carries a fixed whitelist of numeric fields it can be binned
/// by; the mapping is not configurable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Person records (route segment `users`).
    Account,
    /// Date-keyed participation events (route segment `dailywalk`).
    DailyWalk,
    /// Timestamp-keyed participation events (route segment `intentionalwalk`).
    IntentionalWalk,
    /// Per-contest ranking rollups (route segment `leaderboard`).
    Leaderboard,
}

impl RecordKind {
    /// Parse a route segment into a record kind.
    pub fn from_route(segment: &str) -> Option<Self> {
        match segment {
            "users" => Some(Self::Account),
            "dailywalk" => Some(Self::DailyWalk),
            "intentionalwalk" => Some(Self::IntentionalWalk),
            "leaderboard" => Some(Self::Leaderboard),
            _ => None,
        }
    }

    pub fn route_name(&self) -> &'static str {
        match self {
            Self::Account => "users",
            Self::DailyWalk => "dailywalk",
            Self::IntentionalWalk => "intentionalwalk",
            Self::Leaderboard => "leaderboard",
        }
    }

    /// The fields this kind may be binned by.
    pub fn supported_fields(&self) -> &'static [HistogramField] {
        match self {
            Self::Leaderboard => &[HistogramField::Steps],
            Self::DailyWalk | Self::IntentionalWalk => {
                &[HistogramField::Steps, HistogramField::Distance]
            }
            Self::Account => &[HistogramField::Age],
        }
    }

    pub fn supports(&self, field: HistogramField) -> bool {
        self.supported_fields().contains(&field)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_name())
    }
}

/// A numeric attribute that histograms can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramField {
    Steps,
    Distance,
    Age,
}

impl HistogramField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "steps" => Some(Self::Steps),
            "distance" => Some(Self::Distance),
            "age" => Some(Self::Age),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::Distance => "distance",
            Self::Age => "age",
        }
    }

    /// Fixed per-field unit label reported alongside the bins.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::Distance => "miles",
            Self::Age => "years",
        }
    }
}

impl fmt::Display for HistogramField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exactly one binning strategy must be supplied per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinStrategy {
    /// Equal-width bins of the given size.
    Size(i64),
    /// A target number of equal-width bins; the width is derived from the
    /// observed maximum.
    Count(i64),
    /// Explicit breakpoints; bins are the half-open intervals between
    /// consecutive values, the last one open-ended.
    Custom(Vec<i64>),
}

/// Raw histogram query parameters, exactly as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistogramQuery {
    pub field: Option<String>,
    pub contest_id: Option<String>,
    pub is_tester: Option<String>,
    pub bin_size: Option<String>,
    pub bin_count: Option<String>,
    pub bin_custom: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A fully validated histogram request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramRequest {
    pub kind: RecordKind,
    pub field: HistogramField,
    pub strategy: BinStrategy,
    pub contest_id: Option<String>,
    pub is_tester: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl HistogramRequest {
    /// Validate raw query parameters against a record kind.
    ///
    /// Every rule failure is keyed by the offending parameter; rules that
    /// span parameters use `non_field_errors`.
    pub fn from_query(kind: RecordKind, query: &HistogramQuery) -> Result<Self, HistogramError> {
        let bin_size = parse_opt_int("bin_size", query.bin_size.as_deref())?;
        let bin_count = parse_opt_int("bin_count", query.bin_count.as_deref())?;
        let bin_custom = parse_bin_custom(query.bin_custom.as_deref())?;
        let start_date = parse_opt_date("start_date", query.start_date.as_deref())?;
        let end_date = parse_opt_date("end_date", query.end_date.as_deref())?;
        let is_tester = parse_opt_bool("is_tester", query.is_tester.as_deref())?.unwrap_or(false);

        let supplied =
            [bin_size.is_some(), bin_count.is_some(), bin_custom.is_some()]
                .iter()
                .filter(|present| **present)
                .count();
        if supplied > 1 {
            return Err(HistogramError::non_field(
                "bin_size, bin_count and bin_custom are mutually exclusive.",
            ));
        }
        if supplied == 0 {
            return Err(HistogramError::non_field(
                "bin_size, bin_count, or bin_custom is required.",
            ));
        }

        if let Some(size) = bin_size {
            if size <= 0 {
                return Err(HistogramError::field(
                    "bin_size",
                    "bin_size must be greater than 0.",
                ));
            }
        }
        if let Some(count) = bin_count {
            if count < 2 {
                return Err(HistogramError::field(
                    "bin_count",
                    "bin_count must be greater than 1.",
                ));
            }
        }
        if let Some(breaks) = &bin_custom {
            if breaks.len() < 2 {
                return Err(HistogramError::field(
                    "bin_custom",
                    "bin_custom must contain at least two values.",
                ));
            }
            if !breaks.windows(2).all(|pair| pair[0] < pair[1]) {
                return Err(HistogramError::field(
                    "bin_custom",
                    "bin_custom values must be in increasing order.",
                ));
            }
            if breaks.iter().any(|value| *value < 0) {
                return Err(HistogramError::field(
                    "bin_custom",
                    "bin_custom values must be positive.",
                ));
            }
        }

        let field_name = query
            .field
            .as_deref()
            .ok_or_else(|| HistogramError::field("field", "field is required."))?;
        let field = HistogramField::parse(field_name)
            .filter(|field| kind.supports(*field))
            .ok_or_else(|| {
                let valid: Vec<&str> = kind
                    .supported_fields()
                    .iter()
                    .map(|field| field.name())
                    .collect();
                HistogramError::non_field(format!(
                    "{} is not supported for {}. Please use one of {:?}.",
                    field_name, kind, valid
                ))
            })?;

        if query.contest_id.is_some() && (start_date.is_some() || end_date.is_some()) {
            return Err(HistogramError::non_field(
                "contest_id and start_date/end_date are mutually exclusive.",
            ));
        }

        let strategy = if let Some(size) = bin_size {
            BinStrategy::Size(size)
        } else if let Some(count) = bin_count {
            BinStrategy::Count(count)
        } else if let Some(breaks) = bin_custom {
            BinStrategy::Custom(breaks)
        } else {
            // `supplied == 1` guarantees one of the branches above was taken.
            return Err(HistogramError::non_field(
                "bin_size, bin_count, or bin_custom is required.",
            ));
        };

        Ok(Self {
            kind,
            field,
            strategy,
            contest_id: query.contest_id.clone(),
            is_tester,
            start_date,
            end_date,
        })
    }
}

fn parse_opt_int(name: &str, raw: Option<&str>) -> Result<Option<i64>, HistogramError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| HistogramError::field(name, format!("{} could not be parsed: {}", name, raw)))
}

fn parse_opt_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, HistogramError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            HistogramError::field(name, format!("{} must be an ISO date (YYYY-MM-DD): {}", name, raw))
        })
}

fn parse_opt_bool(name: &str, raw: Option<&str>) -> Result<Option<bool>, HistogramError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        _ => Err(HistogramError::field(
            name,
            format!("{} must be a boolean: {}", name, raw),
        )),
    }
}

/// Parse the comma-separated breakpoint list. Empty input (or an empty
/// string) counts as absent; stray commas are tolerated.
fn parse_bin_custom(raw: Option<&str>) -> Result<Option<Vec<i64>>, HistogramError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let mut breaks = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let value = part.parse::<i64>().map_err(|_| {
            HistogramError::field("bin_custom", format!("bin_custom could not be parsed: {}", raw))
        })?;
        breaks.push(value);
    }
    if breaks.is_empty() {
        return Ok(None);
    }
    Ok(Some(breaks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::error::NON_FIELD_ERRORS;

    fn query(field: &str) -> HistogramQuery {
        HistogramQuery {
            field: Some(field.to_string()),
            ..Default::default()
        }
    }

    fn error_keys(err: HistogramError) -> Vec<String> {
        err.errors().keys().cloned().collect()
    }

    #[test]
    fn test_no_strategy_rejected() {
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &query("steps")).unwrap_err();
        assert_eq!(error_keys(err), vec![NON_FIELD_ERRORS.to_string()]);
    }

    #[test]
    fn test_multiple_strategies_rejected() {
        let mut q = query("steps");
        q.bin_size = Some("10".to_string());
        q.bin_count = Some("5".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert!(err
            .errors()
            .get(NON_FIELD_ERRORS)
            .is_some_and(|msg| msg.contains("mutually exclusive")));

        let mut q = query("steps");
        q.bin_size = Some("10".to_string());
        q.bin_custom = Some("0,10,20".to_string());
        assert!(HistogramRequest::from_query(RecordKind::DailyWalk, &q).is_err());
    }

    #[test]
    fn test_bin_size_must_be_positive() {
        for raw in ["0", "-5"] {
            let mut q = query("steps");
            q.bin_size = Some(raw.to_string());
            let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
            assert_eq!(error_keys(err), vec!["bin_size".to_string()]);
        }
    }

    #[test]
    fn test_bin_count_must_be_at_least_two() {
        let mut q = query("steps");
        q.bin_count = Some("1".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert_eq!(error_keys(err), vec!["bin_count".to_string()]);
    }

    #[test]
    fn test_bin_custom_must_increase() {
        let mut q = query("steps");
        q.bin_custom = Some("0,20,10".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert!(err
            .errors()
            .get("bin_custom")
            .is_some_and(|msg| msg.contains("increasing")));
    }

    #[test]
    fn test_bin_custom_rejects_negatives() {
        let mut q = query("steps");
        q.bin_custom = Some("-10,0,10".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert_eq!(error_keys(err), vec!["bin_custom".to_string()]);
    }

    #[test]
    fn test_bin_custom_parse_failure() {
        let mut q = query("steps");
        q.bin_custom = Some("0,ten,20".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert!(err
            .errors()
            .get("bin_custom")
            .is_some_and(|msg| msg.contains("could not be parsed")));
    }

    #[test]
    fn test_bin_custom_single_value_rejected() {
        let mut q = query("steps");
        q.bin_custom = Some("10".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert!(err
            .errors()
            .get("bin_custom")
            .is_some_and(|msg| msg.contains("at least two")));
    }

    #[test]
    fn test_bin_custom_tolerates_stray_commas() {
        let mut q = query("steps");
        q.bin_custom = Some("0,10,,20,".to_string());
        let req = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap();
        assert_eq!(req.strategy, BinStrategy::Custom(vec![0, 10, 20]));
    }

    #[test]
    fn test_field_whitelist_per_kind() {
        // age is only valid for users; steps is invalid there.
        let mut q = query("age");
        q.bin_size = Some("10".to_string());
        assert!(HistogramRequest::from_query(RecordKind::Account, &q).is_ok());

        for kind in [
            RecordKind::DailyWalk,
            RecordKind::IntentionalWalk,
            RecordKind::Leaderboard,
        ] {
            let mut q = query("age");
            q.bin_size = Some("10".to_string());
            let err = HistogramRequest::from_query(kind, &q).unwrap_err();
            assert!(err
                .errors()
                .get(NON_FIELD_ERRORS)
                .is_some_and(|msg| msg.contains("not supported")));
        }

        // distance is valid for both walk kinds but not leaderboard.
        let mut q = query("distance");
        q.bin_size = Some("2".to_string());
        assert!(HistogramRequest::from_query(RecordKind::DailyWalk, &q).is_ok());
        assert!(HistogramRequest::from_query(RecordKind::IntentionalWalk, &q).is_ok());
        assert!(HistogramRequest::from_query(RecordKind::Leaderboard, &q).is_err());
    }

    #[test]
    fn test_whitelist_error_names_alternatives() {
        let mut q = query("elevation");
        q.bin_size = Some("10".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        let msg = err.errors().remove(NON_FIELD_ERRORS).unwrap();
        assert!(msg.contains("steps"));
        assert!(msg.contains("distance"));
    }

    #[test]
    fn test_contest_and_dates_mutually_exclusive() {
        for dates in [
            (Some("2023-04-01"), None),
            (None, Some("2023-04-30")),
            (Some("2023-04-01"), Some("2023-04-30")),
        ] {
            let mut q = query("steps");
            q.bin_size = Some("100".to_string());
            q.contest_id = Some("abc".to_string());
            q.start_date = dates.0.map(str::to_string);
            q.end_date = dates.1.map(str::to_string);
            let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
            assert!(err
                .errors()
                .get(NON_FIELD_ERRORS)
                .is_some_and(|msg| msg.contains("mutually exclusive")));
        }
    }

    #[test]
    fn test_field_required() {
        let mut q = HistogramQuery::default();
        q.bin_size = Some("10".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert_eq!(error_keys(err), vec!["field".to_string()]);
    }

    #[test]
    fn test_is_tester_defaults_false() {
        let mut q = query("steps");
        q.bin_size = Some("10".to_string());
        let req = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap();
        assert!(!req.is_tester);

        q.is_tester = Some("true".to_string());
        let req = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap();
        assert!(req.is_tester);

        q.is_tester = Some("maybe".to_string());
        assert!(HistogramRequest::from_query(RecordKind::DailyWalk, &q).is_err());
    }

    #[test]
    fn test_unparseable_numbers_keyed_by_parameter() {
        let mut q = query("steps");
        q.bin_size = Some("lots".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert_eq!(error_keys(err), vec!["bin_size".to_string()]);

        let mut q = query("steps");
        q.bin_count = Some("3.5".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert_eq!(error_keys(err), vec!["bin_count".to_string()]);
    }

    #[test]
    fn test_date_parse_errors() {
        let mut q = query("steps");
        q.bin_size = Some("10".to_string());
        q.start_date = Some("04/01/2023".to_string());
        let err = HistogramRequest::from_query(RecordKind::DailyWalk, &q).unwrap_err();
        assert_eq!(error_keys(err), vec!["start_date".to_string()]);
    }

    #[test]
    fn test_route_names_round_trip() {
        for kind in [
            RecordKind::Account,
            RecordKind::DailyWalk,
            RecordKind::IntentionalWalk,
            RecordKind::Leaderboard,
        ] {
            assert_eq!(RecordKind::from_route(kind.route_name()), Some(kind));
        }
        assert_eq!(RecordKind::from_route("devices"), None);
    }

    #[test]
    fn test_field_units() {
        assert_eq!(HistogramField::Steps.unit(), "steps");
        assert_eq!(HistogramField::Distance.unit(), "miles");
        assert_eq!(HistogramField::Age.unit(), "years");
    }
}
