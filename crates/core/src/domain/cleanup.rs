use crate::domain::status::ChangeCounts;
use serde::{Deserialize, Serialize};

/// What a cleanup run found and did in one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupSummary {
    /// Uncommitted changes found before cleaning up
    pub changes: ChangeCounts,
    /// Whether those changes were hard-reset away
    pub dropped: bool,
    pub current_branch: String,
    pub default_branch: String,
    pub pruned: usize,
    pub prune_failures: usize,
    /// Local branches left after pruning, the default branch included
    pub remaining_branches: usize,
}

impl CleanupSummary {
    pub fn is_tidy(&self) -> bool {
        self.changes.is_clean()
            && self.current_branch == self.default_branch
            && self.remaining_branches == 1
            && self.pruned == 0
            && self.prune_failures == 0
    }
}

/// Branches a cleanup must never delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedBranches {
    names: Vec<String>,
}

impl ProtectedBranches {
    /// The default branch is always protected, on top of any configured names
    pub fn new(default_branch: &str, configured: &[String]) -> Self {
        let mut names = vec![default_branch.to_string()];
        for name in configured {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Self { names }
    }

    pub fn protect(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tidy() -> CleanupSummary {
        CleanupSummary {
            changes: ChangeCounts::default(),
            dropped: false,
            current_branch: "main".into(),
            default_branch: "main".into(),
            pruned: 0,
            prune_failures: 0,
            remaining_branches: 1,
        }
    }

    #[test]
    fn test_tidy_summary() {
        assert!(tidy().is_tidy());

        let mut pruned = tidy();
        pruned.pruned = 2;
        assert!(!pruned.is_tidy());

        let mut off_default = tidy();
        off_default.current_branch = "feature".into();
        assert!(!off_default.is_tidy());
    }

    #[test]
    fn test_default_branch_always_protected() {
        let protected = ProtectedBranches::new("main", &[]);
        assert!(protected.contains("main"));
        assert!(!protected.contains("feature"));

        let mut protected = ProtectedBranches::new("main", &["develop".into(), "main".into()]);
        assert!(protected.contains("develop"));
        protected.protect("release");
        assert!(protected.contains("release"));
    }
}
