mod common;

use anyhow::Result;
use clap::Parser;
use common::*;
use std::fs;
use swissgit::adapters::FsLocator;
use swissgit::app::{load_config, run_on_repositories};
use swissgit::cli::{CliArgs, Command};
use swissgit::services::{CleanupOperation, RepoSettings};
use swissgit_core::ports::RecordingReporter;
use tempfile::TempDir;

// CLI args -> config loading -> operation settings
#[test]
fn test_config_and_cli_integration() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_file = temp_dir.path().join("swissgit.toml");
    fs::write(
        &config_file,
        r#"
version = 1
default_branch = "trunk"
stale_after_days = 45
protected_branches = ["release"]

[github]
api_url = "https://github.example.com/api/v3"
merge_method = "squash"

[ssh]
key = "id_work"
"#,
    )?;

    let args = CliArgs::parse_from([
        "swissgit",
        "cleanup",
        "--config",
        config_file.to_str().unwrap(),
        "--all",
        "--path",
        temp_dir.path().to_str().unwrap(),
    ]);
    let config = load_config(args.config.as_deref())?;

    assert_eq!(config.default_branch, "trunk");
    assert_eq!(config.stale_after_days, 45);
    assert_eq!(config.protected_branches, vec!["release".to_string()]);
    assert_eq!(config.github.api_url, "https://github.example.com/api/v3");
    assert_eq!(config.ssh.key.as_deref(), Some("id_work"));

    let settings = RepoSettings::from(&config);
    assert_eq!(settings.default_branch, "trunk");
    assert_eq!(settings.ssh_key.as_deref(), Some("id_work"));

    match args.command {
        Command::Cleanup { target, drop } => {
            assert!(target.all);
            assert!(!drop);
            assert_eq!(target.path, temp_dir.path());
        }
        other => panic!("unexpected command {:?}", other),
    }
    Ok(())
}

#[test]
fn test_missing_config_file_is_created_with_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_file = temp_dir.path().join("nested").join("swissgit.toml");

    let config = load_config(Some(&config_file))?;

    assert!(config_file.exists());
    assert_eq!(config.default_branch, "main");
    assert_eq!(config.github.merge_method, "MERGE");
    Ok(())
}

#[test]
fn test_configured_protected_branch_survives_cleanup() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (repo, _bare) = create_repo_with_origin(temp_dir.path(), "acme", "gateway")?;
    let head = repo.head()?.peel_to_commit()?;
    repo.branch("release", &head, false)?;
    repo.branch("old-fix", &head, false)?;

    let config_file = temp_dir.path().join("swissgit.toml");
    fs::write(
        &config_file,
        "version = 1\ndefault_branch = \"main\"\nstale_after_days = 120\nprotected_branches = [\"release\"]\n",
    )?;
    let config = load_config(Some(&config_file))?;

    let args = CliArgs::parse_from(["swissgit", "cleanup", "-p", temp_dir.path().join("gateway").to_str().unwrap()]);
    let Command::Cleanup { target, drop } = args.command else {
        panic!("expected cleanup");
    };

    let mut op = CleanupOperation::new(drop, config.protected_branches.clone(), RepoSettings::from(&config));
    let mut reporter = RecordingReporter::new();
    run_on_repositories(&FsLocator::new(), &target, &mut op, &mut reporter)?;

    assert!(repo.find_branch("release", git2::BranchType::Local).is_ok());
    assert!(repo.find_branch("old-fix", git2::BranchType::Local).is_err());
    assert!(repo.find_branch("main", git2::BranchType::Local).is_ok());
    Ok(())
}
