//! Composition root: wires adapters and services to the parsed command line.

use crate::adapters::persistence::load_template;
use crate::adapters::{ConsoleReporter, FileConfigStore, FsLocator, GitHubClient};
use crate::cli::{CliArgs, Command, Target};
use crate::services::commit::CommitRequest;
use crate::services::pull_request::PullRequestDetails;
use crate::services::{
    AutomergeOperation, BranchesOperation, CleanupOperation, CloneOperation, CommitOperation,
    PullRequestOperation, RepoSettings, StatusOperation,
};
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use swissgit_core::app::{run_batch, Operation};
use swissgit_core::error::OperationError;
use swissgit_core::ports::{AppConfig, ConfigStore, HostingPort, RepoLocator, Reporter};
use swissgit_core::{
    parse_confirmation, BatchResult, ChangeType, RemoteRepo, RepositoryRef, ScanConfig,
};
use tracing::info;

pub fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    let store = match path {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new()?,
    };
    store.load()
}

fn hosting(config: &AppConfig) -> GitHubClient {
    GitHubClient::from_env(&config.github.api_url).with_merge_method(&config.github.merge_method)
}

/// Locate the repositories `target` names and run `op` over them.
///
/// Returns `None` when a single path was given and it is not a repository;
/// that has already been reported.
pub fn run_on_repositories<L, O>(
    locator: &L,
    target: &Target,
    op: &mut O,
    reporter: &mut dyn Reporter,
) -> Result<Option<BatchResult<RepositoryRef>>>
where
    L: RepoLocator + ?Sized,
    O: Operation + ?Sized,
{
    let scan = ScanConfig::new(&target.path, target.all);
    let repositories = locator
        .locate(&scan)
        .with_context(|| format!("Failed to scan {}", target.path.display()))?;

    if repositories.is_empty() && !target.all {
        let root = RepositoryRef::new(&target.path);
        let err = OperationError::NotARepository {
            path: target.path.clone(),
        };
        reporter.finish(&root.dir_name(), &err.into());
        return Ok(None);
    }

    info!("Processing {} repositories", repositories.len());
    Ok(Some(run_batch(&repositories, op, reporter)))
}

/// Success only when every repository was processed without failure
fn succeeded<T>(result: Option<BatchResult<T>>) -> bool {
    matches!(result, Some(batch) if !batch.has_failures())
}

/// Ask for the change types and breaking-change flag of a pull request
pub fn prompt_pull_request<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<(Vec<ChangeType>, bool)> {
    writeln!(output, "Type of change:")?;
    for (i, change) in ChangeType::ALL.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, change)?;
    }
    write!(output, "Select all that apply (e.g. 125): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let changes = ChangeType::parse_selection(&line);

    write!(output, "Is this a breaking change? [Y/N]: ")?;
    output.flush()?;
    line.clear();
    input.read_line(&mut line)?;

    Ok((changes, parse_confirmation(&line)))
}

fn clone_sources(
    hosting: &dyn HostingPort,
    repo: Option<String>,
    org: Option<String>,
    team: Option<String>,
) -> Result<Vec<RemoteRepo>> {
    match (repo, org) {
        (Some(url), _) => Ok(vec![RemoteRepo::from_url(&url)]),
        (None, Some(org)) => hosting
            .list_org_repos(&org, team.as_deref())
            .with_context(|| format!("Failed to list repositories of {}", org)),
        (None, None) => anyhow::bail!("Either --repo or --org is required"),
    }
}

pub fn run(args: CliArgs) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let settings = RepoSettings::from(&config);
    let locator = FsLocator::new();
    let mut reporter = ConsoleReporter::new();

    let ok = match args.command {
        Command::Status { target, verbose } => {
            let mut op = StatusOperation::new(verbose, settings);
            succeeded(run_on_repositories(&locator, &target, &mut op, &mut reporter)?)
        }
        Command::Branches { target, verbose } => {
            let mut op = BranchesOperation::new(verbose, config.stale_after_days, settings);
            succeeded(run_on_repositories(&locator, &target, &mut op, &mut reporter)?)
        }
        Command::Clone {
            repo,
            org,
            team,
            path,
        } => {
            let client = hosting(&config);
            let sources = clone_sources(&client, repo, org, team)?;
            let mut op = CloneOperation::new(path, settings.ssh_key);
            succeeded(Some(run_batch(&sources, &mut op, &mut reporter)))
        }
        Command::Commit {
            target,
            message,
            branch,
        } => {
            let request = CommitRequest { message, branch };
            let mut op = CommitOperation::new(request, settings.ssh_key);
            succeeded(run_on_repositories(&locator, &target, &mut op, &mut reporter)?)
        }
        Command::PullRequest {
            target,
            message,
            branch,
            target_branch,
        } => {
            let template = load_template(&config)?;
            let (changes, breaking) = prompt_pull_request(&mut io::stdin().lock(), &mut io::stdout())
                .context("Failed to read pull request details")?;
            let details = PullRequestDetails {
                message,
                branch,
                target: target_branch,
                changes,
                breaking,
            };
            let mut op = PullRequestOperation::new(details, template, settings.ssh_key, hosting(&config));
            succeeded(run_on_repositories(&locator, &target, &mut op, &mut reporter)?)
        }
        Command::Cleanup { target, drop } => {
            let mut op = CleanupOperation::new(drop, config.protected_branches.clone(), settings);
            succeeded(run_on_repositories(&locator, &target, &mut op, &mut reporter)?)
        }
        Command::Automerge {
            target,
            target_search,
        } => {
            let mut op = AutomergeOperation::new(target_search, hosting(&config));
            succeeded(run_on_repositories(&locator, &target, &mut op, &mut reporter)?)
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;
    use swissgit_core::ports::RecordingReporter;
    use swissgit_core::OperationOutcome;
    use tempfile::TempDir;

    #[test]
    fn test_prompt_reads_changes_and_breaking_flag() -> Result<()> {
        let mut input = Cursor::new("15\ny\n");
        let mut output = Vec::new();

        let (changes, breaking) = prompt_pull_request(&mut input, &mut output)?;

        assert_eq!(changes, vec![ChangeType::BugFix, ChangeType::Refactoring]);
        assert!(breaking);
        let shown = String::from_utf8(output)?;
        assert!(shown.contains("1. Bug fix"));
        assert!(shown.contains("7. Documentation content changes"));
        Ok(())
    }

    #[test]
    fn test_prompt_on_closed_input() -> Result<()> {
        let mut input = Cursor::new("");
        let (changes, breaking) = prompt_pull_request(&mut input, &mut Vec::new())?;
        assert!(changes.is_empty());
        assert!(!breaking);
        Ok(())
    }

    #[test]
    fn test_single_path_that_is_not_a_repository() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let target = Target {
            path: temp_dir.path().to_path_buf(),
            all: false,
        };
        let mut op = StatusOperation::new(false, RepoSettings::default());
        let mut reporter = RecordingReporter::new();

        let result = run_on_repositories(&FsLocator::new(), &target, &mut op, &mut reporter)?;

        assert!(result.is_none());
        assert_eq!(reporter.printed_lines().len(), 1);
        assert!(reporter.printed_lines()[0].contains("is not a Git repository"));
        assert!(!succeeded::<RepositoryRef>(None));
        Ok(())
    }

    #[test]
    fn test_unreadable_root_is_an_error() {
        let target = Target {
            path: PathBuf::from("/definitely/not/here"),
            all: true,
        };
        let mut op = StatusOperation::new(false, RepoSettings::default());
        let mut reporter = RecordingReporter::new();

        let result = run_on_repositories(&FsLocator::new(), &target, &mut op, &mut reporter);
        assert!(result.is_err());
        assert!(reporter.events.is_empty());
    }

    #[test]
    fn test_file_given_as_root_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("notes.txt");
        std::fs::write(&file, "not a folder")?;
        let target = Target {
            path: file,
            all: true,
        };
        let mut op = StatusOperation::new(false, RepoSettings::default());
        let mut reporter = RecordingReporter::new();

        let result = run_on_repositories(&FsLocator::new(), &target, &mut op, &mut reporter);
        assert!(result.is_err());
        assert!(reporter.events.is_empty());
        Ok(())
    }

    #[test]
    fn test_clone_sources_from_url() -> Result<()> {
        let client = GitHubClient::new("token", "http://127.0.0.1:9");
        let sources = clone_sources(&client, Some("git@github.com:acme/api.git".into()), None, None)?;
        assert_eq!(
            sources,
            vec![RemoteRepo {
                name: "api".into(),
                ssh_url: "git@github.com:acme/api.git".into(),
            }]
        );
        Ok(())
    }

    #[test]
    fn test_success_requires_no_failures() {
        let mut batch = BatchResult::new();
        batch.push(swissgit_core::OutcomeRecord {
            item: 1,
            name: "a".into(),
            outcome: OperationOutcome::Quiet,
        });
        assert!(succeeded(Some(batch.clone())));

        batch.push(swissgit_core::OutcomeRecord {
            item: 2,
            name: "b".into(),
            outcome: OperationOutcome::Failure("boom".into()),
        });
        assert!(!succeeded(Some(batch)));
    }
}
