use crate::Result;
use crate::facts::{RepoSpec, RepositoryDataset};

/// Source of repository datasets.
///
/// Implementations decide how repository data is obtained. Any failure to produce a dataset
/// is reported as an error, which callers treat as "dataset unusable".
pub trait RepositoryClient: Send + Sync {
    /// Produce a dataset describing the given repository.
    fn fetch(&self, repo: &RepoSpec) -> impl Future<Output = Result<RepositoryDataset>> + Send;
}
