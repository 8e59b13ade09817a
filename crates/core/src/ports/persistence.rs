use crate::domain::branches::DEFAULT_STALE_AFTER_DAYS;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration store interface
pub trait ConfigStore {
    /// Load configuration from storage
    fn load(&self) -> Result<AppConfig>;

    /// Save configuration to storage
    fn save(&self, config: &AppConfig) -> Result<()>;
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: u32,
    /// Used when a repository has no `origin/HEAD` to tell its default branch
    pub default_branch: String,
    pub stale_after_days: u32,
    /// Never deleted by cleanup, on top of the default branch
    #[serde(default)]
    pub protected_branches: Vec<String>,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub ssh: SshConfig,
    #[serde(default)]
    pub pull_request: PullRequestConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubConfig {
    pub api_url: String,
    /// `MERGE`, `SQUASH` or `REBASE`
    pub merge_method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SshConfig {
    /// Key file name under `~/.ssh`; the `SSH_KEY` environment variable wins
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullRequestConfig {
    pub template: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            default_branch: "main".to_string(),
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            protected_branches: Vec::new(),
            github: GithubConfig::default(),
            ssh: SshConfig::default(),
            pull_request: PullRequestConfig::default(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            merge_method: "MERGE".to_string(),
        }
    }
}
