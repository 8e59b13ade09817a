use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "swissgit")]
#[command(about = "Run everyday Git and GitHub chores across one repository or a whole folder of them")]
#[command(version)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where to look for repositories
#[derive(Args, Debug, PartialEq, Clone)]
pub struct Target {
    /// Repository, or with --all the folder holding the repositories
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Process every repository directly under --path
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show branch, changes and distance from the remote
    Status {
        #[command(flatten)]
        target: Target,

        /// Also report repositories with nothing to show
        #[arg(short, long)]
        verbose: bool,
    },

    /// List local and remote branches, flagging stale ones
    Branches {
        #[command(flatten)]
        target: Target,

        /// Also report repositories with nothing to show
        #[arg(short, long)]
        verbose: bool,
    },

    /// Clone one repository, or every repository of an organization
    #[command(group(clap::ArgGroup::new("source").required(true).args(["repo", "org"])))]
    Clone {
        /// SSH URL of the repository
        #[arg(short, long)]
        repo: Option<String>,

        /// Organization whose repositories to clone
        #[arg(short, long)]
        org: Option<String>,

        /// Only the repositories of this team of --org
        #[arg(short, long, requires = "org")]
        team: Option<String>,

        /// Folder the clones are placed in
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    /// Stage everything, commit and push
    Commit {
        #[command(flatten)]
        target: Target,

        /// Commit message, prefixed with the branch name
        #[arg(short, long)]
        message: String,

        /// Create or switch to this branch before committing
        #[arg(short, long)]
        branch: Option<String>,
    },

    /// Commit and push to a branch, then open a pull request
    #[command(name = "pullrequest")]
    PullRequest {
        #[command(flatten)]
        target: Target,

        /// Commit message, also used as the pull request title
        #[arg(short, long)]
        message: String,

        /// Branch to commit to and open the pull request from
        #[arg(short, long)]
        branch: String,

        /// Branch the pull request targets
        #[arg(short = 't', long = "target", default_value = "main")]
        target_branch: String,
    },

    /// Return to the default branch, update it and delete merged branches
    Cleanup {
        #[command(flatten)]
        target: Target,

        /// Hard-reset uncommitted changes instead of only reporting them
        #[arg(short, long)]
        drop: bool,
    },

    /// Enable auto-merge on the open pull request matching a search term
    Automerge {
        #[command(flatten)]
        target: Target,

        /// Text to look for in the head branch, base branch or title
        #[arg(short = 't', long = "target")]
        target_search: String,
    },
}
