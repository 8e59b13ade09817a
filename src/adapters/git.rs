//! Version-control engine adapter built on git2.
//!
//! A [`GitSession`] owns one opened repository for the lifetime of a single
//! operation and is dropped with it.

use crate::adapters::ssh::SshAuth;
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    BranchType, ErrorCode, FetchOptions, FetchPrune, Oid, PushOptions, Repository, ResetType,
    StashFlags, Status, StatusOptions,
};
use std::path::{Path, PathBuf};
use swissgit_core::error::{OperationError, Result};
use swissgit_core::{AheadBehind, ChangeCounts, RemoteSlug, RepositoryRef};
use tracing::debug;

pub const DEFAULT_REMOTE: &str = "origin";

/// Attach context to git2 errors
pub trait GitResultExt<T> {
    fn git_context(self, context: &str) -> Result<T>;
}

impl<T> GitResultExt<T> for std::result::Result<T, git2::Error> {
    fn git_context(self, context: &str) -> Result<T> {
        self.map_err(|e| OperationError::git(context, e.message()))
    }
}

/// A branch name with the commit time of its tip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTip {
    pub name: String,
    pub tip_time: i64,
}

/// Result of bringing a local branch up to date with its remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullResult {
    UpToDate,
    FastForwarded,
    /// The remote has no such branch
    NoUpstream,
}

/// Count working-tree changes from a status listing
pub fn count_changes(statuses: &git2::Statuses<'_>) -> ChangeCounts {
    let mut counts = ChangeCounts::default();

    for entry in statuses.iter() {
        let status = entry.status();
        if status.contains(Status::WT_NEW) {
            counts.untracked += 1;
        }
        if status.intersects(
            Status::INDEX_MODIFIED
                | Status::WT_MODIFIED
                | Status::INDEX_RENAMED
                | Status::WT_RENAMED
                | Status::INDEX_TYPECHANGE
                | Status::WT_TYPECHANGE,
        ) {
            counts.modified += 1;
        }
        if status.contains(Status::INDEX_NEW) {
            counts.added += 1;
        }
        if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
            counts.deleted += 1;
        }
    }

    counts
}

/// Clone `url` into `dest`, authenticating with `auth`
pub fn clone_repository(url: &str, dest: &Path, auth: &SshAuth) -> Result<()> {
    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(auth.callbacks());

    RepoBuilder::new()
        .fetch_options(fetch_options)
        .clone(url, dest)
        .map_err(|e| OperationError::remote("clone", e.message()))?;

    Ok(())
}

pub struct GitSession {
    repo: Repository,
    path: PathBuf,
}

impl GitSession {
    pub fn open(repo_ref: &RepositoryRef) -> Result<Self> {
        Self::open_path(repo_ref.path())
    }

    pub fn open_path(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                OperationError::NotARepository {
                    path: path.to_path_buf(),
                }
            } else {
                OperationError::git("could not open repository", e.message())
            }
        })?;

        Ok(Self {
            repo,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `origin` when configured, else the first remote
    fn primary_remote_name(&self) -> Option<String> {
        let remotes = self.repo.remotes().ok()?;
        let names: Vec<&str> = remotes.iter().flatten().collect();
        if names.contains(&DEFAULT_REMOTE) {
            Some(DEFAULT_REMOTE.to_string())
        } else {
            names.first().map(|n| n.to_string())
        }
    }

    pub fn has_remotes(&self) -> bool {
        self.primary_remote_name().is_some()
    }

    /// Owner and name of the hosted repository, from the primary remote's URL
    pub fn remote_slug(&self) -> Result<RemoteSlug> {
        let name = self
            .primary_remote_name()
            .ok_or_else(|| OperationError::NameResolution {
                reason: "repository has no remotes".to_string(),
            })?;

        let remote = self
            .repo
            .find_remote(&name)
            .map_err(|e| OperationError::NameResolution {
                reason: e.message().to_string(),
            })?;

        let url = remote.url().unwrap_or_default();
        RemoteSlug::parse(url).ok_or_else(|| OperationError::NameResolution {
            reason: format!("could not parse remote URL: {}", url),
        })
    }

    /// Current branch; a short commit id when HEAD is detached
    pub fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(str::to_string)
                .ok_or_else(|| OperationError::git("could not get branch name", "invalid UTF-8")),
            Ok(head) => Ok(head
                .target()
                .map(|oid| format!("{:.8}", oid))
                .unwrap_or_else(|| "HEAD".to_string())),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                // No commits yet: HEAD still names the branch it will create
                let head = self
                    .repo
                    .find_reference("HEAD")
                    .git_context("could not get head")?;
                Ok(head
                    .symbolic_target()
                    .and_then(|t| t.strip_prefix("refs/heads/"))
                    .unwrap_or("HEAD")
                    .to_string())
            }
            Err(e) => Err(OperationError::git("could not get head", e.message())),
        }
    }

    /// Branch `origin/HEAD` points at, else `fallback`
    pub fn default_branch(&self, fallback: &str) -> String {
        let remote = self
            .primary_remote_name()
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string());
        let head_ref = format!("refs/remotes/{}/HEAD", remote);
        let prefix = format!("refs/remotes/{}/", remote);

        self.repo
            .find_reference(&head_ref)
            .ok()
            .and_then(|r| r.symbolic_target().map(str::to_string))
            .and_then(|t| t.strip_prefix(&prefix).map(str::to_string))
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn change_counts(&self) -> Result<ChangeCounts> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .git_context("could not get status of repository")?;

        Ok(count_changes(&statuses))
    }

    /// Remote tracking ref of `branch`: its configured upstream, else `origin/<branch>`
    fn tracking_ref(&self, branch: &str) -> Option<String> {
        let local = format!("refs/heads/{}", branch);
        if let Ok(upstream) = self.repo.branch_upstream_name(&local) {
            if let Some(name) = upstream.as_str() {
                return Some(name.to_string());
            }
        }

        let remote = self.primary_remote_name()?;
        let fallback = format!("refs/remotes/{}/{}", remote, branch);
        self.repo.find_reference(&fallback).ok().map(|_| fallback)
    }

    /// Commits `branch` has that its tracking branch lacks, and the reverse.
    ///
    /// Zero on both sides when there is no tracking branch.
    pub fn ahead_behind(&self, branch: &str) -> Result<AheadBehind> {
        let Some(tracking) = self.tracking_ref(branch) else {
            debug!("No remote tracking branch for {}", branch);
            return Ok(AheadBehind::default());
        };

        let local = match self.repo.refname_to_id(&format!("refs/heads/{}", branch)) {
            Ok(oid) => oid,
            Err(_) => return Ok(AheadBehind::default()),
        };
        let remote = self
            .repo
            .refname_to_id(&tracking)
            .git_context("could not resolve remote tracking branch")?;

        self.ahead_behind_between(local, remote)
    }

    pub fn ahead_behind_between(&self, local: Oid, remote: Oid) -> Result<AheadBehind> {
        let (ahead, behind) = self
            .repo
            .graph_ahead_behind(local, remote)
            .git_context("could not compare with remote")?;
        Ok(AheadBehind::new(ahead, behind))
    }

    /// Fetch every configured refspec of the primary remote, pruning deleted branches
    pub fn fetch(&self, auth: &SshAuth) -> Result<()> {
        let name = self
            .primary_remote_name()
            .ok_or_else(|| OperationError::remote("fetch", "repository has no remotes"))?;
        let mut remote = self
            .repo
            .find_remote(&name)
            .map_err(|e| OperationError::remote("fetch", e.message()))?;

        let mut options = FetchOptions::new();
        options.prune(FetchPrune::On);
        options.remote_callbacks(auth.callbacks());

        remote
            .fetch(&[] as &[&str], Some(&mut options), None)
            .map_err(|e| OperationError::remote("fetch", e.message()))?;

        debug!("Fetched {} for {}", name, self.path.display());
        Ok(())
    }

    fn commit_time(&self, reference: &git2::Reference<'_>) -> Option<i64> {
        reference
            .peel_to_commit()
            .ok()
            .map(|c| c.committer().when().seconds())
    }

    pub fn local_branches(&self) -> Result<Vec<BranchTip>> {
        let mut tips = Vec::new();
        for branch in self
            .repo
            .branches(Some(BranchType::Local))
            .git_context("could not list local branches")?
        {
            let (branch, _) = branch.git_context("could not list local branches")?;
            let Some(name) = branch.name().ok().flatten().map(str::to_string) else {
                continue;
            };
            let tip_time = self.commit_time(branch.get()).unwrap_or_default();
            tips.push(BranchTip { name, tip_time });
        }
        Ok(tips)
    }

    /// Remote branches with the remote prefix removed, skipping each remote's
    /// `HEAD` and its mirror of `default_branch`
    pub fn remote_branches(&self, default_branch: &str) -> Result<Vec<BranchTip>> {
        let mut tips = Vec::new();
        for branch in self
            .repo
            .branches(Some(BranchType::Remote))
            .git_context("could not list remote branches")?
        {
            let (branch, _) = branch.git_context("could not list remote branches")?;
            let Some(full) = branch.name().ok().flatten().map(str::to_string) else {
                continue;
            };
            let name = match full.split_once('/') {
                Some((_remote, rest)) => rest.to_string(),
                None => full.clone(),
            };
            if name == "HEAD" || name == default_branch {
                continue;
            }
            let tip_time = self.commit_time(branch.get()).unwrap_or_default();
            tips.push(BranchTip { name, tip_time });
        }
        Ok(tips)
    }

    /// Discard index and worktree changes to tracked files
    pub fn hard_reset(&self) -> Result<()> {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .git_context("could not get head")?;
        self.repo
            .reset(head.as_object(), ResetType::Hard, None)
            .git_context("could not reset changes")?;
        Ok(())
    }

    /// Check out `branch`, creating it from its remote tracking branch when it
    /// only exists remotely. Uncommitted changes are kept.
    pub fn checkout_branch(&self, branch: &str) -> Result<()> {
        let refname = format!("refs/heads/{}", branch);

        if self.repo.find_reference(&refname).is_err() {
            let tracking = self.tracking_ref(branch).ok_or_else(|| {
                OperationError::git("could not check out branch", format!("no branch named {}", branch))
            })?;
            let commit = self
                .repo
                .find_reference(&tracking)
                .and_then(|r| r.peel_to_commit())
                .git_context("could not resolve remote branch")?;
            self.repo
                .branch(branch, &commit, false)
                .git_context("could not create branch")?;
        }

        let target = self
            .repo
            .revparse_single(&refname)
            .git_context("could not resolve branch")?;
        self.repo
            .checkout_tree(&target, Some(CheckoutBuilder::new().safe()))
            .git_context("could not check out branch")?;
        self.repo
            .set_head(&refname)
            .git_context("could not check out branch")?;
        Ok(())
    }

    /// Fast-forward local `branch` to its remote tracking branch
    pub fn fast_forward(&self, branch: &str) -> Result<PullResult> {
        let Some(tracking) = self.tracking_ref(branch) else {
            return Ok(PullResult::NoUpstream);
        };

        let refname = format!("refs/heads/{}", branch);
        let local = self
            .repo
            .refname_to_id(&refname)
            .map_err(|e| OperationError::remote("pull", e.message()))?;
        let remote = self
            .repo
            .refname_to_id(&tracking)
            .map_err(|e| OperationError::remote("pull", e.message()))?;

        if local == remote || self.is_ancestor(remote, local)? {
            return Ok(PullResult::UpToDate);
        }
        if !self.is_ancestor(local, remote)? {
            return Err(OperationError::remote("pull", "non fast-forward update"));
        }

        let on_branch = self.current_branch().ok().as_deref() == Some(branch);
        if on_branch {
            let commit = self
                .repo
                .find_commit(remote)
                .map_err(|e| OperationError::remote("pull", e.message()))?;
            self.repo
                .checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))
                .map_err(|e| OperationError::remote("pull", e.message()))?;
        }

        self.repo
            .find_reference(&refname)
            .and_then(|mut r| r.set_target(remote, "swissgit: fast-forward"))
            .map_err(|e| OperationError::remote("pull", e.message()))?;

        Ok(PullResult::FastForwarded)
    }

    /// Whether `ancestor` is reachable from `descendant` (a commit is its own ancestor)
    pub fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }
        self.repo
            .graph_descendant_of(descendant, ancestor)
            .git_context("could not compare commits")
    }

    pub fn branch_tip(&self, branch: &str) -> Result<Oid> {
        self.repo
            .refname_to_id(&format!("refs/heads/{}", branch))
            .git_context("could not resolve branch")
    }

    pub fn delete_branch(&self, branch: &str) -> Result<()> {
        let mut found = self
            .repo
            .find_branch(branch, BranchType::Local)
            .git_context("could not find branch")?;
        found.delete().git_context("could not delete branch")
    }

    /// Stage every addition, modification and deletion in the worktree
    pub fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index().git_context("could not read index")?;
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .git_context("failed to add files")?;
        index
            .update_all(["*"].iter(), None)
            .git_context("failed to add files")?;
        index.write().git_context("failed to write index")?;
        Ok(())
    }

    /// Switch to `branch` (created at HEAD when missing), carrying uncommitted
    /// work across the checkout in a stash
    pub fn switch_branch_with_stash(&mut self, branch: &str) -> Result<()> {
        let refname = format!("refs/heads/{}", branch);

        let head_commit = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit().git_context("could not get head")?.id()),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(OperationError::git("could not get head", e.message())),
        };

        let Some(head_commit) = head_commit else {
            // Nothing committed yet: the new branch is born with the first commit
            self.repo
                .set_head(&refname)
                .git_context("failed to create and check out branch")?;
            return Ok(());
        };

        let signature = self
            .repo
            .signature()
            .git_context("could not determine commit identity")?;
        let stashed = match self.repo.stash_save(
            &signature,
            "Temporary stash before branch switch",
            Some(StashFlags::INCLUDE_UNTRACKED),
        ) {
            Ok(_) => true,
            Err(e) if e.code() == ErrorCode::NotFound => false,
            Err(e) => return Err(OperationError::git("failed to stash changes", e.message())),
        };

        let switched = self.checkout_new_or_existing(branch, &refname, head_commit);

        // Restore the work whether or not the switch worked
        if stashed {
            self.repo
                .stash_pop(0, None)
                .git_context("failed to apply stash")?;
        }
        switched
    }

    fn checkout_new_or_existing(&self, branch: &str, refname: &str, head: Oid) -> Result<()> {
        if self.repo.find_branch(branch, BranchType::Local).is_err() {
            let commit = self.repo.find_commit(head).git_context("could not get head")?;
            self.repo
                .branch(branch, &commit, false)
                .git_context("failed to create branch")?;
        }

        let target = self
            .repo
            .revparse_single(refname)
            .git_context("could not resolve branch")?;
        self.repo
            .checkout_tree(&target, Some(CheckoutBuilder::new().safe()))
            .git_context("failed to check out branch")?;
        self.repo
            .set_head(refname)
            .git_context("failed to check out branch")?;
        Ok(())
    }

    /// Commit the index on top of HEAD with the repository's configured identity
    pub fn commit(&self, message: &str) -> Result<Oid> {
        let signature = self
            .repo
            .signature()
            .git_context("could not determine commit identity")?;
        let mut index = self.repo.index().git_context("could not read index")?;
        let tree_id = index.write_tree().git_context("failed to write tree")?;
        let tree = self
            .repo
            .find_tree(tree_id)
            .git_context("failed to write tree")?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit().git_context("could not get head")?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(OperationError::git("could not get head", e.message())),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .git_context("failed to commit changes")
    }

    /// Push `branch` to the same-named branch of the primary remote
    pub fn push(&self, branch: &str, auth: &SshAuth) -> Result<()> {
        let name = self
            .primary_remote_name()
            .ok_or_else(|| OperationError::remote("push", "repository has no remotes"))?;
        let mut remote = self
            .repo
            .find_remote(&name)
            .map_err(|e| OperationError::remote("push", e.message()))?;

        let mut callbacks = auth.callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(reason) => Err(git2::Error::from_str(&format!(
                "{} was rejected: {}",
                refname, reason
            ))),
            None => Ok(()),
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        remote
            .push(&[refspec.as_str()], Some(&mut options))
            .map_err(|e| OperationError::remote("push", e.message()))?;

        debug!("Pushed {} to {}", branch, name);
        Ok(())
    }
}
