//! Histogram orchestration: validate, plan, query, fill.

use crate::db::{RepositoryError, WalkRepository};
use crate::histogram::{
    fill_missing_bins, plan_bins, resolve_filter, Bin, EchoParam, HistogramError, HistogramQuery,
    HistogramRequest, RecordKind,
};

/// Errors surfaced by the histogram service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Histogram(#[from] HistogramError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The complete result of one histogram request: the dense bin list, the
/// field's unit label, and the strategy parameter to echo back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramResult {
    pub data: Vec<Bin>,
    pub unit: &'static str,
    pub echo: EchoParam,
}

/// Compute a histogram over `kind` records from raw query parameters.
///
/// Two queries run at most: an aggregate min/max, then a grouped count.
/// When the first finds no matching records the second is skipped and an
/// empty bin list is returned with the supplied strategy parameter echoed
/// unchanged.
pub async fn histogram(
    repo: &dyn WalkRepository,
    kind: RecordKind,
    query: &HistogramQuery,
) -> Result<HistogramResult, ServiceError> {
    let request = HistogramRequest::from_query(kind, query)?;

    let contest = match &request.contest_id {
        Some(contest_id) => Some(
            repo.find_contest(contest_id)
                .await?
                .ok_or_else(|| HistogramError::ContestNotFound(contest_id.clone()))?,
        ),
        None => None,
    };

    let filter = resolve_filter(&request, contest.as_ref())?;
    let unit = request.field.unit();

    let Some(range) = repo.field_range(request.field, &filter).await? else {
        tracing::debug!(
            kind = kind.route_name(),
            field = %request.field,
            "histogram matched no records"
        );
        return Ok(HistogramResult {
            data: Vec::new(),
            unit,
            echo: EchoParam::from_strategy(&request.strategy),
        });
    };

    let plan = plan_bins(&request.strategy, &range);
    let sparse = repo.grouped_counts(request.field, &filter, &plan.spec).await?;
    tracing::debug!(
        kind = kind.route_name(),
        field = %request.field,
        populated = sparse.len(),
        total = plan.total_bins,
        "filling histogram bins"
    );
    let data: Vec<Bin> = fill_missing_bins(sparse, &plan.spec, plan.total_bins).collect();

    Ok(HistogramResult {
        data,
        unit,
        echo: plan.echo,
    })
}
