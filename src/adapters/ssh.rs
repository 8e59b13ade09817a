//! SSH credentials for remote git transport.

use git2::{Cred, CredentialType, RemoteCallbacks};
use std::path::PathBuf;
use swissgit_core::error::{OperationError, Result};
use tracing::debug;

pub const SSH_KEY_ENV: &str = "SSH_KEY";

/// Where remote transport gets its SSH identity from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SshAuth {
    /// Private key file
    KeyFile(PathBuf),
    /// Whatever the running ssh-agent offers
    Agent,
}

impl SshAuth {
    /// Resolve the key named by `SSH_KEY`, else `configured`, under `~/.ssh`.
    ///
    /// With no key named at all the agent is used. A named key that does not
    /// exist is an authentication error.
    pub fn resolve(configured: Option<&str>) -> Result<Self> {
        let named = std::env::var(SSH_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| configured.map(str::to_string));

        let Some(key) = named else {
            debug!("No SSH key configured, using ssh-agent");
            return Ok(SshAuth::Agent);
        };

        let home = dirs::home_dir()
            .ok_or_else(|| OperationError::auth("could not get user home directory"))?;
        Self::key_in(home.join(".ssh"), &key)
    }

    fn key_in(ssh_dir: PathBuf, key: &str) -> Result<Self> {
        let path = ssh_dir.join(key);
        if !path.is_file() {
            return Err(OperationError::auth(format!(
                "could not read SSH key file {}",
                path.display()
            )));
        }
        Ok(SshAuth::KeyFile(path))
    }

    /// Callbacks answering credential requests with this identity.
    ///
    /// libgit2 asks again after a rejected key; the second request gives up
    /// instead of looping.
    pub fn callbacks(&self) -> RemoteCallbacks<'static> {
        let auth = self.clone();
        let mut attempts = 0u32;
        let mut callbacks = RemoteCallbacks::new();

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or("git");
            if allowed_types.contains(CredentialType::USERNAME) {
                return Cred::username(username);
            }

            attempts += 1;
            if attempts > 1 {
                return Err(git2::Error::from_str("SSH authentication was rejected"));
            }

            match &auth {
                SshAuth::KeyFile(path) => Cred::ssh_key(username, None, path, None),
                SshAuth::Agent => Cred::ssh_key_from_agent(username),
            }
        });

        callbacks
    }
}
