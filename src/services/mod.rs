//! One [`Operation`](swissgit_core::app::Operation) per subcommand.

pub mod automerge;
pub mod branches;
pub mod cleanup;
pub mod clone;
pub mod commit;
pub mod pull_request;
pub mod status;

pub use automerge::AutomergeOperation;
pub use branches::BranchesOperation;
pub use cleanup::CleanupOperation;
pub use clone::CloneOperation;
pub use commit::CommitOperation;
pub use pull_request::PullRequestOperation;
pub use status::StatusOperation;

use crate::adapters::git::GitSession;
use swissgit_core::error::Result;
use swissgit_core::ports::AppConfig;
use swissgit_core::RepositoryRef;

/// Configuration every repository operation reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSettings {
    /// Used when `origin/HEAD` does not name the default branch
    pub default_branch: String,
    pub ssh_key: Option<String>,
}

impl From<&AppConfig> for RepoSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_branch: config.default_branch.clone(),
            ssh_key: config.ssh.key.clone(),
        }
    }
}

impl Default for RepoSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// Hosted name of a repository, read from its remote URL
pub fn hosted_name(repo: &RepositoryRef) -> Result<String> {
    let session = GitSession::open(repo)?;
    Ok(session.remote_slug()?.name)
}

#[cfg(test)]
pub(crate) mod testing;
