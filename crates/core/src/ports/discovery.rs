use crate::domain::repo::{RepositoryRef, ScanConfig};
use crate::error::Result;

/// Port for locating the repositories a batch operates on
pub trait RepoLocator {
    /// Without `recurse_one_level`, yields the root itself when it is a
    /// repository and nothing otherwise. With it, yields every immediate child
    /// directory that is a repository, in directory-listing order.
    ///
    /// Fails with `DirectoryRead` only when the root cannot be listed.
    fn locate(&self, config: &ScanConfig) -> Result<Vec<RepositoryRef>>;
}
