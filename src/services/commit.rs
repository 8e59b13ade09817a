use crate::adapters::git::GitSession;
use crate::adapters::ssh::SshAuth;
use crate::services::hosted_name;
use swissgit_core::app::Operation;
use swissgit_core::error::{OperationError, Result};
use swissgit_core::{commit_message, OperationOutcome, RepositoryRef};
use tracing::debug;

/// What a commit and push should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub message: String,
    /// Branch to create or switch to first; the current branch when `None`
    pub branch: Option<String>,
}

/// Stage everything, commit as `<branch>: <message>` and push the branch.
///
/// Returns the branch that was pushed. A working tree without changes fails
/// with [`OperationError::NothingToCommit`] before any branch is touched.
pub fn commit_and_push(
    repo: &RepositoryRef,
    request: &CommitRequest,
    ssh_key: Option<&str>,
) -> Result<String> {
    let mut session = GitSession::open(repo)?;

    session.stage_all()?;
    if session.change_counts()?.is_clean() {
        return Err(OperationError::NothingToCommit);
    }

    let branch = match &request.branch {
        Some(branch) => {
            session.switch_branch_with_stash(branch)?;
            // the stash brings changes back unstaged
            session.stage_all()?;
            branch.clone()
        }
        None => session.current_branch()?,
    };

    let oid = session.commit(&commit_message(&branch, &request.message))?;
    debug!("Committed {} on {}", oid, branch);

    let auth = SshAuth::resolve(ssh_key)?;
    session.push(&branch, &auth)?;
    Ok(branch)
}

pub struct CommitOperation {
    request: CommitRequest,
    ssh_key: Option<String>,
}

impl CommitOperation {
    pub fn new(request: CommitRequest, ssh_key: Option<String>) -> Self {
        Self { request, ssh_key }
    }
}

impl Operation for CommitOperation {
    fn display_name(&self, repo: &RepositoryRef) -> Result<String> {
        hosted_name(repo)
    }

    fn label(&self, name: &str) -> String {
        format!("{}: committing and pushing", name)
    }

    fn run(&mut self, repo: &RepositoryRef) -> Result<OperationOutcome> {
        let branch = commit_and_push(repo, &self.request, self.ssh_key.as_deref())?;
        Ok(OperationOutcome::Success(format!(
            "committed and pushed {} to remote",
            branch
        )))
    }
}
