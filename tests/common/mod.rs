#![allow(dead_code)]

use anyhow::Result;
use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::{Path, PathBuf};

/// Helper function to create a test git repository on `main` with one commit
pub fn create_test_git_repo(path: &Path) -> Result<Repository> {
    fs::create_dir_all(path)?;
    let mut options = RepositoryInitOptions::new();
    options.initial_head("main");
    let repo = Repository::init_opts(path, &options)?;

    let mut config = repo.config()?;
    config.set_str("user.name", "Test User")?;
    config.set_str("user.email", "test@example.com")?;

    commit_file(&repo, "README.md", "# Test Repository\n")?;
    Ok(repo)
}

pub fn commit_file(repo: &Repository, file: &str, content: &str) -> Result<Oid> {
    let workdir = repo.workdir().expect("non-bare repository");
    fs::write(workdir.join(file), content)?;
    let mut index = repo.index()?;
    index.add_path(Path::new(file))?;
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let signature = Signature::now("Test User", "test@example.com")?;
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    Ok(repo.commit(Some("HEAD"), &signature, &signature, file, &tree, &parents)?)
}

pub fn create_and_checkout(repo: &Repository, branch: &str) -> Result<()> {
    let head = repo.head()?.peel_to_commit()?;
    repo.branch(branch, &head, false)?;
    let refname = format!("refs/heads/{}", branch);
    repo.set_head(&refname)?;
    Ok(())
}

/// Bare `origin` at `<root>/<owner>/<name>.git` for a repository at `<root>/<name>`
pub fn create_repo_with_origin(root: &Path, owner: &str, name: &str) -> Result<(Repository, PathBuf)> {
    let bare_path = root.join(owner).join(format!("{}.git", name));
    fs::create_dir_all(&bare_path)?;
    let mut options = RepositoryInitOptions::new();
    options.bare(true).initial_head("main");
    Repository::init_opts(&bare_path, &options)?;

    let repo = create_test_git_repo(&root.join(name))?;
    {
        let mut remote = repo.remote("origin", bare_path.to_str().expect("utf-8 path"))?;
        remote.push(&["refs/heads/main:refs/heads/main"], None)?;
        remote.fetch(&["+refs/heads/*:refs/remotes/origin/*"], None, None)?;
    }
    Ok((repo, bare_path))
}
