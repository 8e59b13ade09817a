pub mod console;
pub mod discovery;
pub mod git;
pub mod github;
pub mod persistence;
pub mod ssh;

pub use console::ConsoleReporter;
pub use discovery::FsLocator;
pub use git::GitSession;
pub use github::GitHubClient;
pub use persistence::FileConfigStore;
pub use ssh::SshAuth;
