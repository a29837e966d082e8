use crate::Result;
use chrono::{DateTime, Utc};
use ohno::bail;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An issue that was still open when the dataset was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenIssue {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// An issue that had been closed when the dataset was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedIssue {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}

/// A pull request in any state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,

    /// Number of completed reviews on the pull request.
    #[serde(default)]
    pub review_count: u32,

    /// Lines added by the pull request.
    #[serde(default)]
    pub additions: u64,
}

impl PullRequest {
    #[must_use]
    pub const fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    #[must_use]
    pub const fn is_reviewed(&self) -> bool {
        self.review_count > 0
    }
}

/// Immutable snapshot of everything needed to score a repository.
///
/// A dataset is created once per rating request, shared read-only between all metric
/// evaluations of that request, and dropped once the score card has been produced.
/// `captured_at` is the reference point for every time-based metric, which keeps
/// evaluation deterministic for a given dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDataset {
    pub owner: String,
    pub repo: String,
    pub captured_at: DateTime<Utc>,

    /// Declared license, usually an SPDX identifier or expression.
    #[serde(default)]
    pub license: Option<String>,

    /// Text of the README, if the repository has one.
    #[serde(default)]
    pub readme: Option<String>,

    #[serde(default)]
    pub open_issues: Vec<OpenIssue>,
    #[serde(default)]
    pub closed_issues: Vec<ClosedIssue>,
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,

    #[serde(default)]
    pub is_archived: bool,

    /// Whether the repository has a non-empty examples directory.
    #[serde(default)]
    pub has_examples: bool,

    /// Commit counts keyed by contributor login.
    #[serde(default)]
    pub contributors: BTreeMap<String, u64>,

    /// Declared dependencies, keyed by name, with their version requirement strings.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Why the package manifest could not be read, if it exists but is malformed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_error: Option<String>,

    /// Number of open issues in the repository. The issue records may only be a sample of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_issue_total: Option<u64>,

    /// Number of closed issues in the repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_issue_total: Option<u64>,

    /// Number of pull requests in the repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_total: Option<u64>,
}

impl RepositoryDataset {
    /// Create an empty dataset for the given repository.
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            captured_at,
            license: None,
            readme: None,
            open_issues: Vec::new(),
            closed_issues: Vec::new(),
            pull_requests: Vec::new(),
            is_archived: false,
            has_examples: false,
            contributors: BTreeMap::new(),
            dependencies: BTreeMap::new(),
            manifest_error: None,
            open_issue_total: None,
            closed_issue_total: None,
            pull_request_total: None,
        }
    }

    /// Check that the dataset is usable for scoring at all.
    ///
    /// This only rejects structural problems that make the dataset meaningless as a whole.
    /// Defects in individual records are left for the metric evaluators to report, so that
    /// they only affect the metrics that read them.
    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() || self.repo.trim().is_empty() {
            bail!("dataset has an empty repository coordinate '{}/{}'", self.owner, self.repo);
        }

        Ok(())
    }

    /// Number of open issues, never less than the number of open issue records.
    #[must_use]
    pub fn open_issue_count(&self) -> u64 {
        total_or_len(self.open_issue_total, self.open_issues.len())
    }

    /// Number of closed issues, never less than the number of closed issue records.
    #[must_use]
    pub fn closed_issue_count(&self) -> u64 {
        total_or_len(self.closed_issue_total, self.closed_issues.len())
    }

    /// Total number of issues, open and closed.
    #[must_use]
    pub fn issue_count(&self) -> u64 {
        self.open_issue_count() + self.closed_issue_count()
    }

    /// Number of pull requests, never less than the number of pull request records.
    #[must_use]
    pub fn pull_request_count(&self) -> u64 {
        total_or_len(self.pull_request_total, self.pull_requests.len())
    }
}

fn total_or_len(total: Option<u64>, len: usize) -> u64 {
    let len = u64::try_from(len).unwrap_or(u64::MAX);
    total.map_or(len, |total| total.max(len))
}

impl core::fmt::Display for RepositoryDataset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
