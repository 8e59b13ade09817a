use crate::adapters::git::{GitSession, PullResult};
use crate::adapters::ssh::SshAuth;
use crate::services::{hosted_name, RepoSettings};
use swissgit_core::app::Operation;
use swissgit_core::error::Result;
use swissgit_core::{CleanupSummary, OperationOutcome, ProtectedBranches, RepositoryRef};
use tracing::{debug, warn};

/// Reset or report local changes, return to the default branch, update it
/// and delete the branches already merged into it
pub struct CleanupOperation {
    drop_changes: bool,
    protected: Vec<String>,
    settings: RepoSettings,
}

impl CleanupOperation {
    pub fn new(drop_changes: bool, protected: Vec<String>, settings: RepoSettings) -> Self {
        Self {
            drop_changes,
            protected,
            settings,
        }
    }

    pub fn clean(&self, session: &GitSession) -> Result<CleanupSummary> {
        let changes = session.change_counts()?;
        let dropped = self.drop_changes && !changes.is_clean();
        if dropped {
            debug!("Dropping changes in {}", session.path().display());
            session.hard_reset()?;
        }

        let default_branch = session.default_branch(&self.settings.default_branch);
        session.checkout_branch(&default_branch)?;

        if session.has_remotes() {
            let auth = SshAuth::resolve(self.settings.ssh_key.as_deref())?;
            session.fetch(&auth)?;
            match session.fast_forward(&default_branch)? {
                PullResult::FastForwarded => debug!("Fast-forwarded {}", default_branch),
                PullResult::UpToDate | PullResult::NoUpstream => {}
            }
        }

        let current_branch = session.current_branch()?;
        let mut protected = ProtectedBranches::new(&default_branch, &self.protected);
        protected.protect(&current_branch);

        let (pruned, prune_failures, remaining_branches) =
            prune_merged(session, &default_branch, &protected)?;

        Ok(CleanupSummary {
            changes,
            dropped,
            current_branch,
            default_branch,
            pruned,
            prune_failures,
            remaining_branches,
        })
    }
}

/// Delete every unprotected local branch whose tip the default branch already contains.
///
/// Returns how many were deleted, how many could not be, and how many remain.
fn prune_merged(
    session: &GitSession,
    default_branch: &str,
    protected: &ProtectedBranches,
) -> Result<(usize, usize, usize)> {
    let default_tip = session.branch_tip(default_branch)?;
    let branches = session.local_branches()?;
    let total = branches.len();
    let mut pruned = 0;
    let mut failures = 0;

    for branch in branches {
        if protected.contains(&branch.name) {
            continue;
        }
        let tip = session.branch_tip(&branch.name)?;
        if !session.is_ancestor(tip, default_tip)? {
            continue;
        }
        match session.delete_branch(&branch.name) {
            Ok(()) => {
                debug!("Deleted merged branch {}", branch.name);
                pruned += 1;
            }
            Err(e) => {
                warn!("Could not delete branch {}: {}", branch.name, e);
                failures += 1;
            }
        }
    }

    Ok((pruned, failures, total - pruned))
}

pub fn format_cleanup_line(summary: &CleanupSummary) -> String {
    if summary.is_tidy() {
        return "nothing to clean up".to_string();
    }

    let mut parts = Vec::new();
    let c = summary.changes;
    if summary.dropped {
        parts.push("[Dropped all changes]".to_string());
    } else if !c.is_clean() {
        parts.push(format!(
            "[Non committed changes: Modified: {} Added: {} Deleted: {} Untracked: {}]",
            c.modified, c.added, c.deleted, c.untracked
        ));
    }
    if summary.remaining_branches != 1 {
        parts.push(format!("[Branches: {}]", summary.remaining_branches));
    }
    if summary.current_branch != summary.default_branch {
        parts.push(format!("[Current branch: {}]", summary.current_branch));
    }
    if summary.pruned > 0 {
        parts.push(format!("[Pruned branches: {}]", summary.pruned));
    }
    if summary.prune_failures > 0 {
        parts.push(format!("[Failed to prune: {}]", summary.prune_failures));
    }
    parts.join(" ")
}

impl Operation for CleanupOperation {
    fn display_name(&self, repo: &RepositoryRef) -> Result<String> {
        hosted_name(repo)
    }

    fn label(&self, name: &str) -> String {
        format!("{}: Cleaning up repo", name)
    }

    fn run(&mut self, repo: &RepositoryRef) -> Result<OperationOutcome> {
        let session = GitSession::open(repo)?;
        let summary = self.clean(&session)?;
        Ok(OperationOutcome::Success(format_cleanup_line(&summary)))
    }
}
