//! Repository datasets and where they come from
//!
//! The core type is [`RepositoryDataset`], an immutable snapshot of the repository signals
//! needed to score a package: license, README, issue and pull request history, contributor
//! distribution, and declared dependencies.
//!
//! Datasets are produced by a [`RepositoryClient`]. Two implementations are provided:
//! - [`SnapshotClient`] serves datasets previously stored as JSON files
//! - [`GitHubClient`] queries the GitHub GraphQL and REST APIs
//!
//! Repositories are identified by a [`RepoSpec`], parsed from the URL forms commonly found in
//! package manifests.

mod client;
mod dataset;
mod hosting;
mod repo_spec;
mod snapshot;

pub use client::RepositoryClient;
pub use dataset::{ClosedIssue, OpenIssue, PullRequest, RepositoryDataset};
pub use hosting::GitHubClient;
pub use repo_spec::RepoSpec;
pub use snapshot::{SnapshotClient, load_snapshot, save_snapshot};
