//! Real repositories for service tests.

use anyhow::Result;
use git2::{Oid, Repository, RepositoryInitOptions, Signature, Time};
use std::fs;
use std::path::{Path, PathBuf};

pub const NOW: i64 = 1_760_000_000;

pub fn init_repo(path: &Path) -> Result<Repository> {
    fs::create_dir_all(path)?;
    let mut options = RepositoryInitOptions::new();
    options.initial_head("main");
    let repo = Repository::init_opts(path, &options)?;
    let mut config = repo.config()?;
    config.set_str("user.name", "Test User")?;
    config.set_str("user.email", "test@example.com")?;
    Ok(repo)
}

pub fn commit_file_at(repo: &Repository, file: &str, content: &str, time: i64) -> Result<Oid> {
    let workdir = repo.workdir().expect("non-bare repository");
    fs::write(workdir.join(file), content)?;
    let mut index = repo.index()?;
    index.add_path(Path::new(file))?;
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let signature = Signature::new("Test User", "test@example.com", &Time::new(time, 0))?;
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    Ok(repo.commit(Some("HEAD"), &signature, &signature, file, &tree, &parents)?)
}

pub fn commit_file(repo: &Repository, file: &str, content: &str) -> Result<Oid> {
    commit_file_at(repo, file, content, NOW)
}

/// Create a local branch at HEAD without checking it out
pub fn branch_here(repo: &Repository, name: &str) -> Result<()> {
    let head = repo.head()?.peel_to_commit()?;
    repo.branch(name, &head, false)?;
    Ok(())
}

pub fn checkout(repo: &Repository, name: &str) -> Result<()> {
    let refname = format!("refs/heads/{}", name);
    let target = repo.revparse_single(&refname)?;
    repo.checkout_tree(&target, None)?;
    repo.set_head(&refname)?;
    Ok(())
}

/// A working repository at `<root>/work` whose `origin` is a bare repository
/// at `<root>/acme/api.git`, with one commit on `main` pushed and fetched
pub fn repo_with_origin(root: &Path) -> Result<(Repository, PathBuf)> {
    let bare_path = root.join("acme").join("api.git");
    fs::create_dir_all(&bare_path)?;
    let mut options = RepositoryInitOptions::new();
    options.bare(true).initial_head("main");
    Repository::init_opts(&bare_path, &options)?;

    let repo = init_repo(&root.join("work"))?;
    commit_file(&repo, "README.md", "# api\n")?;
    {
        let mut remote = repo.remote("origin", bare_path.to_str().expect("utf-8 path"))?;
        remote.push(&["refs/heads/main:refs/heads/main"], None)?;
        remote.fetch(&["+refs/heads/*:refs/remotes/origin/*"], None, None)?;
    }
    Ok((repo, bare_path))
}

/// Commit on the origin's `main` through a second clone
pub fn advance_origin(root: &Path, bare_path: &Path, file: &str) -> Result<Oid> {
    let other = Repository::clone(bare_path.to_str().expect("utf-8 path"), root.join("other"))?;
    let mut config = other.config()?;
    config.set_str("user.name", "Other User")?;
    config.set_str("user.email", "other@example.com")?;
    let oid = commit_file(&other, file, "remote change\n")?;
    other
        .find_remote("origin")?
        .push(&["refs/heads/main:refs/heads/main"], None)?;
    Ok(oid)
}
