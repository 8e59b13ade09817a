use serde::{Deserialize, Serialize};

/// A repository listed by the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepo {
    pub name: String,
    pub ssh_url: String,
}

impl RemoteRepo {
    /// Build from a clone URL, naming the repository after its last path segment
    pub fn from_url(url: &str) -> Self {
        let trimmed = url.trim().trim_end_matches('/');
        let last = trimmed
            .rsplit(['/', ':'])
            .next()
            .unwrap_or(trimmed);
        Self {
            name: last.trim_end_matches(".git").to_string(),
            ssh_url: url.trim().to_string(),
        }
    }
}

impl std::fmt::Display for RemoteRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// An open pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    /// Global id, needed by the auto-merge mutation
    pub node_id: String,
    pub title: String,
    pub head: String,
    pub base: String,
}

impl PullRequest {
    /// Whether the head branch, base branch or title mentions `search`
    pub fn matches(&self, search: &str) -> bool {
        self.head.contains(search) || self.base.contains(search) || self.title.contains(search)
    }
}

/// Request body for opening a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}
