//! Data Transfer Objects for the HTTP API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::histogram::{Bin, EchoParam};
use crate::models::Contest;
use crate::services::HistogramResult;

/// Histogram response body: the dense bin list, the field's unit label,
/// and exactly one echoed strategy parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramResponse {
    pub data: Vec<Bin>,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_custom: Option<Vec<i64>>,
}

impl From<HistogramResult> for HistogramResponse {
    fn from(result: HistogramResult) -> Self {
        let mut response = Self {
            data: result.data,
            unit: result.unit.to_string(),
            bin_size: None,
            bin_count: None,
            bin_custom: None,
        };
        match result.echo {
            EchoParam::Size(size) => response.bin_size = Some(size),
            EchoParam::Count(count) => response.bin_count = Some(count),
            EchoParam::Custom(breaks) => response.bin_custom = Some(breaks),
        }
        response
    }
}

/// Contest DTO for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestDto {
    pub contest_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_baseline: Option<NaiveDate>,
    pub start_promo: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<Contest> for ContestDto {
    fn from(contest: Contest) -> Self {
        Self {
            contest_id: contest.contest_id,
            start_baseline: contest.start_baseline,
            start_promo: contest.start_promo,
            start: contest.start,
            end: contest.end,
        }
    }
}

/// Contest list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestListResponse {
    pub contests: Vec<ContestDto>,
    pub total: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Record store connection status
    pub database: String,
}
