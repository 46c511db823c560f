//! Domain models for the walking-contest backend.
//!
//! These are plain data structs mirroring the record store's tables:
//! contests, accounts, the two participation-event kinds, and the
//! per-contest leaderboard rollup.

pub mod account;
pub mod contest;
pub mod leaderboard;
pub mod walks;

pub use account::{Account, AccountId};
pub use contest::Contest;
pub use leaderboard::LeaderboardEntry;
pub use walks::{DailyWalk, IntentionalWalk};
