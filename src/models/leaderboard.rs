//! Leaderboard rollup records.

use serde::{Deserialize, Serialize};

use super::AccountId;

/// Per-account, per-contest total-step rollup used for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub account_id: AccountId,
    pub contest_id: String,
    pub steps: i64,
}
