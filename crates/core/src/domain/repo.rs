use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A filesystem path confirmed to contain version-control metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    path: PathBuf,
}

impl RepositoryRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the repository directory.
    ///
    /// Paths without a final component (`.`, `..`) are canonicalised first so
    /// the current directory still shows a useful name.
    pub fn dir_name(&self) -> String {
        let named = match self.path.file_name() {
            Some(name) => Some(name.to_string_lossy().to_string()),
            None => std::fs::canonicalize(&self.path)
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string())),
        };
        named.unwrap_or_else(|| self.path.display().to_string())
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Read-only scan configuration consumed by a locator
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub recurse_one_level: bool,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>, recurse_one_level: bool) -> Self {
        Self {
            root: root.into(),
            recurse_one_level,
        }
    }
}

/// Owner and name of a hosted repository, as read from a remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSlug {
    pub owner: String,
    pub name: String,
}

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:[:/])([^/]+)/([^/]+?)(?:\.git)?/?$").expect("remote slug pattern is valid")
    })
}

impl RemoteSlug {
    /// Parse `git@github.com:owner/name.git` or `https://github.com/owner/name`
    pub fn parse(url: &str) -> Option<Self> {
        let captures = slug_pattern().captures(url.trim())?;
        Some(Self {
            owner: captures[1].to_string(),
            name: captures[2].to_string(),
        })
    }
}

impl std::fmt::Display for RemoteSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
