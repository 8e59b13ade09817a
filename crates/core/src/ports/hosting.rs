use crate::domain::hosting::{NewPullRequest, PullRequest, RemoteRepo};
use crate::error::Result;

/// Port for the repository hosting service
pub trait HostingPort {
    /// Fail early when no usable credentials are configured, before any
    /// local change is made on the hosting service's behalf
    fn check_credentials(&self) -> Result<()> {
        Ok(())
    }

    /// All repositories of an organization, or of one of its teams,
    /// following pagination to the last page
    fn list_org_repos(&self, org: &str, team: Option<&str>) -> Result<Vec<RemoteRepo>>;

    /// First open pull request matching `search`
    fn find_pull_request(&self, owner: &str, repo: &str, search: &str) -> Result<PullRequest>;

    fn create_pull_request(&self, owner: &str, repo: &str, pr: &NewPullRequest) -> Result<PullRequest>;

    fn enable_auto_merge(&self, pr: &PullRequest) -> Result<()>;
}
