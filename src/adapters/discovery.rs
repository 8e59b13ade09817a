use std::fs;
use std::path::Path;
use swissgit_core::error::{OperationError, Result};
use swissgit_core::ports::RepoLocator;
use swissgit_core::{RepositoryRef, ScanConfig};
use tracing::debug;
use walkdir::WalkDir;

/// Whether `path` holds version-control metadata (a `.git` directory or file)
pub fn is_git_repository(path: &Path) -> bool {
    path.join(".git").exists()
}

/// File system locator that implements RepoLocator
#[derive(Debug, Default)]
pub struct FsLocator;

impl FsLocator {
    pub fn new() -> Self {
        Self
    }

    /// Immediate child directories of `root` that are repositories, by name
    fn find_child_repos(&self, root: &Path) -> Result<Vec<RepositoryRef>> {
        // A file root would otherwise surface as an empty listing
        fs::read_dir(root).map_err(|source| OperationError::DirectoryRead {
            path: root.to_path_buf(),
            source,
        })?;

        let mut repositories = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    return Err(OperationError::DirectoryRead {
                        path: root.to_path_buf(),
                        source,
                    });
                }
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if is_git_repository(entry.path()) {
                repositories.push(RepositoryRef::new(entry.path()));
            }
        }

        Ok(repositories)
    }
}

impl RepoLocator for FsLocator {
    fn locate(&self, config: &ScanConfig) -> Result<Vec<RepositoryRef>> {
        let repos = if config.recurse_one_level {
            self.find_child_repos(&config.root)?
        } else if is_git_repository(&config.root) {
            vec![RepositoryRef::new(&config.root)]
        } else {
            Vec::new()
        };

        debug!(
            "Located {} repositories under {}",
            repos.len(),
            config.root.display()
        );
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_git_repo(path: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(path)?;
        fs::create_dir(path.join(".git"))?;
        Ok(())
    }

    #[test]
    fn test_single_mode_returns_root() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        create_test_git_repo(temp_dir.path())?;

        let repos = FsLocator::new().locate(&ScanConfig::new(temp_dir.path(), false))?;
        assert_eq!(repos, vec![RepositoryRef::new(temp_dir.path())]);
        Ok(())
    }

    #[test]
    fn test_single_mode_plain_directory_is_empty() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let repos = FsLocator::new().locate(&ScanConfig::new(temp_dir.path(), false))?;
        assert!(repos.is_empty());
        Ok(())
    }

    #[test]
    fn test_recursive_mode_lists_child_repos_in_name_order() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path();

        create_test_git_repo(&base.join("zeta"))?;
        create_test_git_repo(&base.join("alpha"))?;
        fs::create_dir(base.join("plain"))?;
        fs::write(base.join("notes.txt"), "not a directory")?;

        let repos = FsLocator::new().locate(&ScanConfig::new(base, true))?;
        let names: Vec<String> = repos.iter().map(|r| r.to_string()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        Ok(())
    }

    #[test]
    fn test_recursive_mode_stops_at_one_level() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path();

        create_test_git_repo(&base.join("group").join("nested"))?;

        let repos = FsLocator::new().locate(&ScanConfig::new(base, true))?;
        assert!(repos.is_empty(), "repositories two levels down are not found");
        Ok(())
    }

    #[test]
    fn test_worktree_git_file_counts_as_repository() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let worktree = temp_dir.path().join("worktree");
        fs::create_dir_all(&worktree)?;
        fs::write(worktree.join(".git"), "gitdir: /some/path")?;

        let repos = FsLocator::new().locate(&ScanConfig::new(temp_dir.path(), true))?;
        assert_eq!(repos.len(), 1);
        Ok(())
    }

    #[test]
    fn test_unreadable_root_is_directory_read_error() {
        let missing = std::env::temp_dir().join("swissgit-definitely-missing-root");
        let err = FsLocator::new()
            .locate(&ScanConfig::new(&missing, true))
            .unwrap_err();
        assert!(matches!(err, OperationError::DirectoryRead { .. }));
    }

    #[test]
    fn test_file_root_is_directory_read_error() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("notes.txt");
        fs::write(&file, "not a directory")?;

        let result = FsLocator::new().locate(&ScanConfig::new(&file, true));
        match result {
            Err(OperationError::DirectoryRead { path, .. }) => assert_eq!(path, file),
            other => panic!("expected a directory read error, got {:?}", other.map(|r| r.len())),
        }
        Ok(())
    }
}
