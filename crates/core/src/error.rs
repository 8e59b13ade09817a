use std::path::PathBuf;
use thiserror::Error;

/// Failures a single-repository operation can end with.
///
/// Every variant is reported as that repository's `Failure(message)`; none of
/// them abort a batch. Only `DirectoryRead` raised by a locator stops a batch,
/// and it does so before any operation runs.
#[derive(Error, Debug)]
pub enum OperationError {
    #[error("{} is not a Git repository", path.display())]
    NotARepository { path: PathBuf },

    #[error("could not resolve repository name: {reason}")]
    NameResolution { reason: String },

    #[error("could not read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("no changes to commit")]
    NothingToCommit,

    #[error("{operation} failed: {reason}")]
    RemoteOperation { operation: String, reason: String },

    #[error("no open pull request matching '{search}'")]
    PullRequestNotFound { search: String },

    #[error("could not create pull request: {reason}")]
    PullRequestCreation { reason: String },

    #[error("{context}: {reason}")]
    Git { context: String, reason: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OperationError {
    pub fn remote(operation: impl Into<String>, reason: impl ToString) -> Self {
        Self::RemoteOperation {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    pub fn git(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::Git {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn auth(reason: impl ToString) -> Self {
        Self::Authentication {
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;
