use serde::{Deserialize, Serialize};

/// Working-tree change counts.
///
/// A path counts as modified, added or deleted when either its index side or
/// its worktree side carries that state; untracked paths are counted apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub modified: usize,
    pub added: usize,
    pub deleted: usize,
    pub untracked: usize,
}

impl ChangeCounts {
    pub fn total(&self) -> usize {
        self.modified + self.added + self.deleted + self.untracked
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

/// Commits on each side of a branch and its remote tracking branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AheadBehind {
    pub ahead: usize,
    pub behind: usize,
}

impl AheadBehind {
    pub fn new(ahead: usize, behind: usize) -> Self {
        Self { ahead, behind }
    }

    /// View from the other side: what is ahead locally is behind remotely
    pub fn swap(self) -> Self {
        Self {
            ahead: self.behind,
            behind: self.ahead,
        }
    }

    pub fn is_even(&self) -> bool {
        self.ahead == 0 && self.behind == 0
    }
}

/// Status summary of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub branch: String,
    pub default_branch: String,
    pub changes: ChangeCounts,
    pub ahead_behind: AheadBehind,
}

impl StatusSummary {
    pub fn on_default_branch(&self) -> bool {
        self.branch == self.default_branch
    }

    /// Nothing to report: on the default branch, clean and level with its remote
    pub fn is_quiet(&self) -> bool {
        self.on_default_branch() && self.changes.is_clean() && self.ahead_behind.is_even()
    }
}
