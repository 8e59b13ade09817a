use crate::adapters::git::GitSession;
use crate::services::commit::{commit_and_push, CommitRequest};
use crate::services::hosted_name;
use swissgit_core::app::Operation;
use swissgit_core::error::Result;
use swissgit_core::ports::HostingPort;
use swissgit_core::{
    build_pull_request_body, commit_message, ChangeType, NewPullRequest, OperationOutcome,
    RepositoryRef,
};
use tracing::debug;

/// Answers collected from the user before the batch starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDetails {
    pub message: String,
    pub branch: String,
    /// Base branch the pull request targets
    pub target: String,
    pub changes: Vec<ChangeType>,
    pub breaking: bool,
}

/// Commit and push to a branch, then open a pull request from it
pub struct PullRequestOperation<H: HostingPort> {
    details: PullRequestDetails,
    template: String,
    ssh_key: Option<String>,
    hosting: H,
}

impl<H: HostingPort> PullRequestOperation<H> {
    pub fn new(details: PullRequestDetails, template: String, ssh_key: Option<String>, hosting: H) -> Self {
        Self {
            details,
            template,
            ssh_key,
            hosting,
        }
    }

    pub fn body(&self) -> String {
        build_pull_request_body(&self.template, &self.details.changes, self.details.breaking)
    }
}

impl<H: HostingPort> Operation for PullRequestOperation<H> {
    fn display_name(&self, repo: &RepositoryRef) -> Result<String> {
        hosted_name(repo)
    }

    fn label(&self, name: &str) -> String {
        format!("{}: creating pull request", name)
    }

    fn run(&mut self, repo: &RepositoryRef) -> Result<OperationOutcome> {
        self.hosting.check_credentials()?;
        let slug = GitSession::open(repo)?.remote_slug()?;

        let request = CommitRequest {
            message: self.details.message.clone(),
            branch: Some(self.details.branch.clone()),
        };
        let branch = commit_and_push(repo, &request, self.ssh_key.as_deref())?;

        let new_pr = NewPullRequest {
            title: commit_message(&branch, &self.details.message),
            head: branch,
            base: self.details.target.clone(),
            body: self.body(),
        };
        let created = self.hosting.create_pull_request(&slug.owner, &slug.name, &new_pr)?;
        debug!("Opened pull request #{} on {}", created.number, slug);

        Ok(OperationOutcome::Success(format!(
            "created pull request #{}",
            created.number
        )))
    }
}
