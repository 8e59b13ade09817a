use crate::adapters::git::GitSession;
use crate::services::hosted_name;
use swissgit_core::app::Operation;
use swissgit_core::error::Result;
use swissgit_core::ports::HostingPort;
use swissgit_core::{OperationOutcome, RepositoryRef};
use tracing::debug;

/// Enable auto-merge on the first open pull request matching a search term
pub struct AutomergeOperation<H: HostingPort> {
    search: String,
    hosting: H,
}

impl<H: HostingPort> AutomergeOperation<H> {
    pub fn new(search: impl Into<String>, hosting: H) -> Self {
        Self {
            search: search.into(),
            hosting,
        }
    }
}

impl<H: HostingPort> Operation for AutomergeOperation<H> {
    fn display_name(&self, repo: &RepositoryRef) -> Result<String> {
        hosted_name(repo)
    }

    fn label(&self, name: &str) -> String {
        format!("{}: enabling auto merge", name)
    }

    fn run(&mut self, repo: &RepositoryRef) -> Result<OperationOutcome> {
        let slug = GitSession::open(repo)?.remote_slug()?;
        let pr = self
            .hosting
            .find_pull_request(&slug.owner, &slug.name, &self.search)?;
        debug!("Matched pull request #{} ({}) on {}", pr.number, pr.head, slug);

        self.hosting.enable_auto_merge(&pr)?;
        Ok(OperationOutcome::Success(format!(
            "enabled auto merge for PR #{}",
            pr.number
        )))
    }
}
