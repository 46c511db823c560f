//! Account (person) records.

use serde::{Deserialize, Serialize};

/// Unique identifier for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// An account/profile entity with the demographic fields the aggregate
/// endpoints care about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    /// Self-reported age in years; optional in the signup flow.
    pub age: Option<i64>,
    pub zip: String,
    /// Marks accounts excluded from production-facing aggregates.
    pub is_tester: bool,
}
