//! In-memory repository for unit testing and local development.
//!
//! The grouped-count evaluation mirrors the SQL the production store would
//! run: `GROUP BY floor(field / bin_size)` for even bins, a `CASE` chain
//! over breakpoint intervals for custom bins. Groups with no rows are
//! never produced; the histogram filler reinstates them.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;

use crate::db::repository::{RepositoryError, RepositoryResult, WalkRepository};
use crate::histogram::{
    Bin, FieldRange, FilterScope, GroupSpec, HistogramField, RecordFilter, RecordKind,
};
use crate::models::{Account, AccountId, Contest, DailyWalk, IntentionalWalk, LeaderboardEntry};

#[derive(Default)]
struct Store {
    contests: Vec<Contest>,
    accounts: HashMap<AccountId, Account>,
    daily_walks: Vec<DailyWalk>,
    intentional_walks: Vec<IntentionalWalk>,
    leaderboard: Vec<LeaderboardEntry>,
}

/// In-memory record store guarded by a read-write lock.
pub struct LocalRepository {
    inner: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Store::default()),
        }
    }

    /// Insert a contest, enforcing its date invariants and rejecting
    /// overlap with existing contests.
    pub fn add_contest(&self, contest: Contest) -> RepositoryResult<()> {
        contest.validate_dates().map_err(RepositoryError::validation)?;
        let mut store = self.inner.write();
        if store
            .contests
            .iter()
            .any(|existing| existing.overlaps(&contest))
        {
            return Err(RepositoryError::validation(
                "Contest must not overlap another",
            ));
        }
        store.contests.push(contest);
        Ok(())
    }

    pub fn add_account(&self, account: Account) -> RepositoryResult<()> {
        let mut store = self.inner.write();
        if store.accounts.contains_key(&account.id) {
            return Err(RepositoryError::validation(format!(
                "Account {} already exists",
                account.id.value()
            )));
        }
        store.accounts.insert(account.id, account);
        Ok(())
    }

    pub fn add_daily_walk(&self, walk: DailyWalk) -> RepositoryResult<()> {
        let mut store = self.inner.write();
        if !store.accounts.contains_key(&walk.account_id) {
            return Err(RepositoryError::validation(format!(
                "Account {} does not exist",
                walk.account_id.value()
            )));
        }
        store.daily_walks.push(walk);
        Ok(())
    }

    pub fn add_intentional_walk(&self, walk: IntentionalWalk) -> RepositoryResult<()> {
        let mut store = self.inner.write();
        if !store.accounts.contains_key(&walk.account_id) {
            return Err(RepositoryError::validation(format!(
                "Account {} does not exist",
                walk.account_id.value()
            )));
        }
        store.intentional_walks.push(walk);
        Ok(())
    }

    pub fn add_leaderboard_entry(&self, entry: LeaderboardEntry) -> RepositoryResult<()> {
        let mut store = self.inner.write();
        if !store.accounts.contains_key(&entry.account_id) {
            return Err(RepositoryError::validation(format!(
                "Account {} does not exist",
                entry.account_id.value()
            )));
        }
        if !store
            .contests
            .iter()
            .any(|contest| contest.contest_id == entry.contest_id)
        {
            return Err(RepositoryError::validation(format!(
                "Contest {} does not exist",
                entry.contest_id
            )));
        }
        store.leaderboard.push(entry);
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    // End of the inclusive day window at microsecond resolution.
    let time = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}

fn within_date(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|bound| date >= bound) && end.is_none_or(|bound| date <= bound)
}

/// Timestamp-keyed events match only when both their start and end fall
/// inside the (full-day, inclusive) window.
fn within_timestamps(
    walk: &IntentionalWalk,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    let lower = start.map(day_start);
    let upper = end.map(day_end);
    lower.is_none_or(|bound| walk.start >= bound && walk.end >= bound)
        && upper.is_none_or(|bound| walk.start <= bound && walk.end <= bound)
}

impl Store {
    fn tester_matches(&self, account_id: AccountId, is_tester: bool) -> bool {
        self.accounts
            .get(&account_id)
            .is_some_and(|account| account.is_tester == is_tester)
    }

    fn account_is_member(
        &self,
        account_id: AccountId,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> bool {
        if start.is_none() && end.is_none() {
            return true;
        }
        // Union of the two participation-event tables.
        self.daily_walks
            .iter()
            .any(|walk| walk.account_id == account_id && within_date(walk.date, start, end))
            || self
                .intentional_walks
                .iter()
                .any(|walk| walk.account_id == account_id && within_timestamps(walk, start, end))
    }

    /// Field values of every record matching the filter.
    fn field_values(
        &self,
        field: HistogramField,
        filter: &RecordFilter,
    ) -> RepositoryResult<Vec<f64>> {
        match filter.kind {
            RecordKind::DailyWalk => {
                let (start, end) = dates_scope(filter)?;
                self.daily_walks
                    .iter()
                    .filter(|walk| {
                        self.tester_matches(walk.account_id, filter.is_tester)
                            && within_date(walk.date, start, end)
                    })
                    .map(|walk| daily_walk_value(walk, field))
                    .collect()
            }
            RecordKind::IntentionalWalk => {
                let (start, end) = dates_scope(filter)?;
                self.intentional_walks
                    .iter()
                    .filter(|walk| {
                        self.tester_matches(walk.account_id, filter.is_tester)
                            && within_timestamps(walk, start, end)
                    })
                    .map(|walk| intentional_walk_value(walk, field))
                    .collect()
            }
            RecordKind::Leaderboard => {
                let FilterScope::Contest { contest_id } = &filter.scope else {
                    return Err(RepositoryError::query(format!(
                        "unsupported filter scope {:?} for leaderboard records",
                        filter.scope
                    )));
                };
                self.leaderboard
                    .iter()
                    .filter(|entry| {
                        entry.contest_id == *contest_id
                            && self.tester_matches(entry.account_id, filter.is_tester)
                    })
                    .map(|entry| leaderboard_value(entry, field))
                    .collect()
            }
            RecordKind::Account => {
                let FilterScope::Membership { start, end } = &filter.scope else {
                    return Err(RepositoryError::query(format!(
                        "unsupported filter scope {:?} for person records",
                        filter.scope
                    )));
                };
                Ok(self
                    .accounts
                    .values()
                    .filter(|account| {
                        account.is_tester == filter.is_tester
                            && self.account_is_member(account.id, *start, *end)
                    })
                    // Null ages are skipped, as aggregate SQL would.
                    .filter_map(|account| match field {
                        HistogramField::Age => account.age.map(|age| age as f64),
                        _ => None,
                    })
                    .collect())
            }
        }
    }
}

fn dates_scope(filter: &RecordFilter) -> RepositoryResult<(Option<NaiveDate>, Option<NaiveDate>)> {
    match &filter.scope {
        FilterScope::Dates { start, end } => Ok((*start, *end)),
        other => Err(RepositoryError::query(format!(
            "unsupported filter scope {:?} for {} records",
            other, filter.kind
        ))),
    }
}

fn daily_walk_value(walk: &DailyWalk, field: HistogramField) -> RepositoryResult<f64> {
    match field {
        HistogramField::Steps => Ok(walk.steps as f64),
        HistogramField::Distance => Ok(walk.distance),
        HistogramField::Age => Err(RepositoryError::query(
            "age is not a dailywalk column".to_string(),
        )),
    }
}

fn intentional_walk_value(walk: &IntentionalWalk, field: HistogramField) -> RepositoryResult<f64> {
    match field {
        HistogramField::Steps => Ok(walk.steps as f64),
        HistogramField::Distance => Ok(walk.distance),
        HistogramField::Age => Err(RepositoryError::query(
            "age is not an intentionalwalk column".to_string(),
        )),
    }
}

fn leaderboard_value(entry: &LeaderboardEntry, field: HistogramField) -> RepositoryResult<f64> {
    match field {
        HistogramField::Steps => Ok(entry.steps as f64),
        other => Err(RepositoryError::query(format!(
            "{} is not a leaderboard column",
            other
        ))),
    }
}

/// First breakpoint interval containing `value`; values outside every
/// interval (including below the first break) land in the final bin, the
/// same way the SQL `CASE` default does.
fn custom_bin_idx(value: f64, breaks: &[i64]) -> usize {
    breaks
        .windows(2)
        .position(|pair| value >= pair[0] as f64 && value < pair[1] as f64)
        .unwrap_or(breaks.len().saturating_sub(1))
}

#[async_trait]
impl WalkRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn find_contest(&self, contest_id: &str) -> RepositoryResult<Option<Contest>> {
        let store = self.inner.read();
        Ok(store
            .contests
            .iter()
            .find(|contest| contest.contest_id == contest_id)
            .cloned())
    }

    async fn list_contests(&self) -> RepositoryResult<Vec<Contest>> {
        let store = self.inner.read();
        let mut contests = store.contests.clone();
        contests.sort_by(|a, b| b.start.cmp(&a.start));
        Ok(contests)
    }

    async fn field_range(
        &self,
        field: HistogramField,
        filter: &RecordFilter,
    ) -> RepositoryResult<Option<FieldRange>> {
        let store = self.inner.read();
        let values = store.field_values(field, filter)?;
        if values.is_empty() {
            return Ok(None);
        }
        let lower = values.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Some(FieldRange { lower, upper }))
    }

    async fn grouped_counts(
        &self,
        field: HistogramField,
        filter: &RecordFilter,
        spec: &GroupSpec,
    ) -> RepositoryResult<Vec<Bin>> {
        let store = self.inner.read();
        let values = store.field_values(field, filter)?;

        let mut counts: BTreeMap<usize, u64> = BTreeMap::new();
        match spec {
            GroupSpec::Even { bin_size } => {
                for value in values {
                    // Field domains are non-negative.
                    let idx = (value.max(0.0) / *bin_size as f64).floor() as usize;
                    *counts.entry(idx).or_insert(0) += 1;
                }
                Ok(counts
                    .into_iter()
                    .map(|(idx, count)| {
                        let bin_start = idx as i64 * bin_size;
                        Bin {
                            bin_idx: idx,
                            bin_start,
                            bin_end: Some(bin_start + bin_size),
                            count,
                        }
                    })
                    .collect())
            }
            GroupSpec::Custom { breaks, upper } => {
                for value in values {
                    let idx = custom_bin_idx(value, breaks);
                    *counts.entry(idx).or_insert(0) += 1;
                }
                Ok(counts
                    .into_iter()
                    .map(|(idx, count)| Bin {
                        bin_idx: idx,
                        bin_start: breaks.get(idx).copied().unwrap_or_default(),
                        // The final populated bin reports the observed
                        // maximum as its end.
                        bin_end: breaks.get(idx + 1).copied().or(Some(*upper)),
                        count,
                    })
                    .collect())
            }
        }
    }
}
