use crate::adapters::git::GitSession;
use crate::adapters::ssh::SshAuth;
use crate::services::RepoSettings;
use swissgit_core::app::Operation;
use swissgit_core::error::Result;
use swissgit_core::{OperationOutcome, RepositoryRef, StatusSummary};
use tracing::{debug, warn};

/// Current branch, uncommitted changes and distance from the remote
pub struct StatusOperation {
    verbose: bool,
    settings: RepoSettings,
}

impl StatusOperation {
    pub fn new(verbose: bool, settings: RepoSettings) -> Self {
        Self { verbose, settings }
    }
}

/// Refresh remote refs on a best-effort basis; stale numbers beat no numbers
fn refresh(session: &GitSession, settings: &RepoSettings) {
    if !session.has_remotes() {
        debug!("{} has no remotes, not fetching", session.path().display());
        return;
    }

    let fetched = SshAuth::resolve(settings.ssh_key.as_deref()).and_then(|auth| session.fetch(&auth));
    if let Err(e) = fetched {
        warn!("Could not fetch {}: {}", session.path().display(), e);
    }
}

pub fn collect_status(session: &GitSession, fallback_default: &str) -> Result<StatusSummary> {
    let branch = session.current_branch()?;
    let changes = session.change_counts()?;
    let ahead_behind = session.ahead_behind(&branch)?;

    Ok(StatusSummary {
        branch,
        default_branch: session.default_branch(fallback_default),
        changes,
        ahead_behind,
    })
}

/// `[branch] [1↑/0↓] [Modified: 2] ...`, listing only non-zero counts
pub fn format_status_line(summary: &StatusSummary) -> String {
    let mut parts = vec![format!("[{}]", summary.branch)];

    let ab = summary.ahead_behind;
    if !ab.is_even() {
        parts.push(format!("[{}↑/{}↓]", ab.ahead, ab.behind));
    }

    let changes = summary.changes;
    for (label, count) in [
        ("Modified", changes.modified),
        ("Added", changes.added),
        ("Deleted", changes.deleted),
        ("Untracked", changes.untracked),
    ] {
        if count > 0 {
            parts.push(format!("[{}: {}]", label, count));
        }
    }

    parts.join(" ")
}

impl Operation for StatusOperation {
    fn display_name(&self, repo: &RepositoryRef) -> Result<String> {
        Ok(repo.dir_name())
    }

    fn label(&self, name: &str) -> String {
        format!("{}: Updating status", name)
    }

    fn run(&mut self, repo: &RepositoryRef) -> Result<OperationOutcome> {
        let session = GitSession::open(repo)?;
        refresh(&session, &self.settings);

        let summary = collect_status(&session, &self.settings.default_branch)?;
        if !self.verbose && summary.is_quiet() {
            return Ok(OperationOutcome::Quiet);
        }
        Ok(OperationOutcome::Success(format_status_line(&summary)))
    }
}
