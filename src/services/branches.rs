use crate::adapters::git::{BranchTip, GitSession};
use crate::adapters::ssh::SshAuth;
use crate::services::RepoSettings;
use swissgit_core::app::Operation;
use swissgit_core::error::Result;
use swissgit_core::ports::{Clock, SystemClock};
use swissgit_core::{is_stale, BranchInfo, BranchSummary, OperationOutcome, RepositoryRef};

/// Local and remote branches, with stale ones flagged
pub struct BranchesOperation {
    verbose: bool,
    stale_after_days: u32,
    settings: RepoSettings,
    clock: Box<dyn Clock>,
}

impl BranchesOperation {
    pub fn new(verbose: bool, stale_after_days: u32, settings: RepoSettings) -> Self {
        Self {
            verbose,
            stale_after_days,
            settings,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

fn classify(mut tips: Vec<BranchTip>, now: i64, stale_after_days: u32) -> Vec<BranchInfo> {
    tips.sort_by(|a, b| a.name.cmp(&b.name));
    tips.into_iter()
        .map(|tip| BranchInfo {
            stale: is_stale(tip.tip_time, now, stale_after_days),
            name: tip.name,
            tip_time: tip.tip_time,
        })
        .collect()
}

pub fn collect_branches(
    session: &GitSession,
    fallback_default: &str,
    now: i64,
    stale_after_days: u32,
) -> Result<BranchSummary> {
    let default_branch = session.default_branch(fallback_default);
    let current = session.current_branch()?;
    let local = classify(session.local_branches()?, now, stale_after_days);
    let remote = classify(session.remote_branches(&default_branch)?, now, stale_after_days);

    Ok(BranchSummary {
        current,
        default_branch,
        local,
        remote,
    })
}

fn format_branch_list(branches: &[BranchInfo]) -> String {
    if branches.is_empty() {
        return "None".to_string();
    }
    branches
        .iter()
        .map(|b| {
            if b.stale {
                format!("{} (stale)", b.name)
            } else {
                b.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `[Current: x] [Local: a, b (stale)] [Remote: None]`
pub fn format_branches_line(summary: &BranchSummary) -> String {
    format!(
        "[Current: {}] [Local: {}] [Remote: {}]",
        summary.current,
        format_branch_list(&summary.local),
        format_branch_list(&summary.remote)
    )
}

impl Operation for BranchesOperation {
    fn display_name(&self, repo: &RepositoryRef) -> Result<String> {
        Ok(repo.dir_name())
    }

    fn label(&self, name: &str) -> String {
        format!("{}: Updating branches", name)
    }

    fn run(&mut self, repo: &RepositoryRef) -> Result<OperationOutcome> {
        let session = GitSession::open(repo)?;
        if session.has_remotes() {
            let auth = SshAuth::resolve(self.settings.ssh_key.as_deref())?;
            session.fetch(&auth)?;
        }

        let summary = collect_branches(
            &session,
            &self.settings.default_branch,
            self.clock.now(),
            self.stale_after_days,
        )?;

        if !self.verbose && summary.is_quiet() {
            return Ok(OperationOutcome::Quiet);
        }
        Ok(OperationOutcome::Success(format_branches_line(&summary)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::*;
    use anyhow::Result;
    use swissgit_core::ports::FixedClock;
    use swissgit_core::SECONDS_PER_DAY;
    use tempfile::TempDir;

    fn operation(verbose: bool) -> BranchesOperation {
        BranchesOperation::new(verbose, 120, RepoSettings::default())
            .with_clock(Box::new(FixedClock(NOW)))
    }

    #[test]
    fn test_only_default_branch_is_quiet() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let repo = init_repo(temp_dir.path())?;
        commit_file(&repo, "a.txt", "a")?;

        let outcome = operation(false).run(&RepositoryRef::new(temp_dir.path()))?;
        assert_eq!(outcome, OperationOutcome::Quiet);

        let outcome = operation(true).run(&RepositoryRef::new(temp_dir.path()))?;
        assert_eq!(
            outcome,
            OperationOutcome::Success("[Current: main] [Local: main] [Remote: None]".into())
        );
        Ok(())
    }

    #[test]
    fn test_stale_local_branch_flagged() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let repo = init_repo(temp_dir.path())?;
        commit_file_at(&repo, "old.txt", "old", NOW - 121 * SECONDS_PER_DAY)?;
        branch_here(&repo, "old-work")?;
        commit_file_at(&repo, "new.txt", "new", NOW - 120 * SECONDS_PER_DAY)?;

        let outcome = operation(false).run(&RepositoryRef::new(temp_dir.path()))?;
        assert_eq!(
            outcome,
            OperationOutcome::Success(
                "[Current: main] [Local: main, old-work (stale)] [Remote: None]".into()
            )
        );
        Ok(())
    }

    #[test]
    fn test_remote_branches_listed_without_default_mirror() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (repo, _bare) = repo_with_origin(temp_dir.path())?;
        let head = repo.head()?.peel_to_commit()?;
        repo.branch("feature", &head, false)?;
        repo.find_remote("origin")?
            .push(&["refs/heads/feature:refs/heads/feature"], None)?;
        repo.find_branch("feature", git2::BranchType::Local)?.delete()?;

        let outcome = operation(false).run(&RepositoryRef::new(repo.workdir().unwrap()))?;
        assert_eq!(
            outcome,
            OperationOutcome::Success("[Current: main] [Local: main] [Remote: feature]".into())
        );
        Ok(())
    }
}
