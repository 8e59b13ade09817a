use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Branches whose tip is older than this many days are stale
pub const DEFAULT_STALE_AFTER_DAYS: u32 = 120;

/// A branch is stale when its tip commit is strictly older than the threshold.
///
/// A tip exactly `stale_after_days` old is still fresh.
pub fn is_stale(tip_time: i64, now: i64, stale_after_days: u32) -> bool {
    now - tip_time > i64::from(stale_after_days) * SECONDS_PER_DAY
}

/// A local or remote branch with the time of its tip commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    pub tip_time: i64,
    pub stale: bool,
}

/// Branch overview of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSummary {
    pub current: String,
    pub default_branch: String,
    pub local: Vec<BranchInfo>,
    /// Remote branches, without the remote's HEAD and default-branch mirror
    pub remote: Vec<BranchInfo>,
}

impl BranchSummary {
    /// Nothing to report: only the default branch exists and it is checked out
    pub fn is_quiet(&self) -> bool {
        self.current == self.default_branch
            && self.local.len() == 1
            && self.local[0].name == self.default_branch
            && self.remote.is_empty()
    }
}
