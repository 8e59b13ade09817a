use crate::adapters::git::clone_repository;
use crate::adapters::ssh::SshAuth;
use std::fs;
use std::path::{Path, PathBuf};
use swissgit_core::app::Operation;
use swissgit_core::error::{OperationError, Result};
use swissgit_core::{OperationOutcome, RemoteRepo};
use tracing::debug;

/// Clone hosted repositories into `<root>/<name>`
pub struct CloneOperation {
    root: PathBuf,
    ssh_key: Option<String>,
}

impl CloneOperation {
    pub fn new(root: impl Into<PathBuf>, ssh_key: Option<String>) -> Self {
        Self {
            root: root.into(),
            ssh_key,
        }
    }

    pub fn destination(&self, repo: &RemoteRepo) -> PathBuf {
        self.root.join(&repo.name)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| OperationError::io(format!("failed to create directory {}", path.display()), e))?;
    }
    Ok(())
}

impl Operation<RemoteRepo> for CloneOperation {
    fn display_name(&self, repo: &RemoteRepo) -> Result<String> {
        if repo.name.is_empty() {
            return Err(OperationError::NameResolution {
                reason: format!("no repository name in {}", repo.ssh_url),
            });
        }
        Ok(repo.name.clone())
    }

    fn label(&self, name: &str) -> String {
        format!("Cloning {}", name)
    }

    fn run(&mut self, repo: &RemoteRepo) -> Result<OperationOutcome> {
        ensure_dir(&self.root)?;
        let dest = self.destination(repo);
        let auth = SshAuth::resolve(self.ssh_key.as_deref())?;

        debug!("Cloning {} into {}", repo.ssh_url, dest.display());
        clone_repository(&repo.ssh_url, &dest, &auth)?;
        Ok(OperationOutcome::Success(format!("cloned into {}", dest.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn test_clones_into_named_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (_repo, bare) = repo_with_origin(temp_dir.path())?;
        let root = temp_dir.path().join("checkouts").join("nested");

        let remote = RemoteRepo {
            name: "api".into(),
            ssh_url: bare.to_string_lossy().to_string(),
        };
        let mut op = CloneOperation::new(&root, None);
        let outcome = op.run(&remote)?;

        assert!(outcome.is_success());
        assert!(root.join("api").join(".git").exists());
        assert!(root.join("api").join("README.md").exists());
        Ok(())
    }

    #[test]
    fn test_clone_into_non_empty_directory_fails() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let (_repo, bare) = repo_with_origin(temp_dir.path())?;
        std::fs::create_dir_all(temp_dir.path().join("out").join("api"))?;
        std::fs::write(temp_dir.path().join("out").join("api").join("keep.txt"), "x")?;

        let remote = RemoteRepo {
            name: "api".into(),
            ssh_url: bare.to_string_lossy().to_string(),
        };
        let mut op = CloneOperation::new(temp_dir.path().join("out"), None);
        let err = op.run(&remote).unwrap_err();
        assert!(matches!(err, OperationError::RemoteOperation { .. }));
        Ok(())
    }

    #[test]
    fn test_unnamed_remote_is_not_resolvable() {
        let op = CloneOperation::new("/tmp", None);
        let remote = RemoteRepo {
            name: String::new(),
            ssh_url: "git@github.com:".into(),
        };
        assert!(op.display_name(&remote).is_err());
    }
}
