//! GitHub GraphQL query and response model.

use crate::Result;
use crate::facts::{ClosedIssue, OpenIssue, PullRequest, RepositoryDataset};
use chrono::{DateTime, Utc};
use ohno::{IntoAppError, bail};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const LOG_TARGET: &str = "   graphql";

/// Query for everything the dataset needs except the contributor distribution, which GraphQL
/// does not expose.
pub const REPOSITORY_QUERY: &str = r#"
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    isArchived
    licenseInfo { spdxId }
    readme: object(expression: "HEAD:README.md") { ... on Blob { text } }
    readmeLower: object(expression: "HEAD:readme.md") { ... on Blob { text } }
    packageJson: object(expression: "HEAD:package.json") { ... on Blob { text } }
    examplesFolder: object(expression: "HEAD:examples") { ... on Tree { entries { name } } }
    openIssues: issues(states: OPEN, first: 100, orderBy: {field: UPDATED_AT, direction: DESC}) {
      totalCount
      nodes { createdAt updatedAt closedAt }
    }
    closedIssues: issues(states: CLOSED, first: 100, orderBy: {field: UPDATED_AT, direction: DESC}) {
      totalCount
      nodes { createdAt updatedAt closedAt }
    }
    pullRequests(first: 100, orderBy: {field: UPDATED_AT, direction: DESC}) {
      totalCount
      nodes {
        createdAt updatedAt closedAt mergedAt additions
        reviews(states: [APPROVED, CHANGES_REQUESTED, COMMENTED]) { totalCount }
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
pub struct Variables<'a> {
    pub owner: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<ResponseData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResponseData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    #[serde(default)]
    pub is_archived: bool,
    pub license_info: Option<LicenseInfo>,
    pub readme: Option<Blob>,
    pub readme_lower: Option<Blob>,
    pub package_json: Option<Blob>,
    pub examples_folder: Option<Tree>,
    pub open_issues: Connection<IssueNode>,
    pub closed_issues: Connection<IssueNode>,
    pub pull_requests: Connection<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInfo {
    pub spdx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Blob {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Tree {
    #[serde(default)]
    pub entries: Vec<IgnoredAny>,
}

/// One page of a connection, along with the size of the whole connection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueNode {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestNode {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub additions: u64,
    pub reviews: Option<TotalCount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u32,
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

impl GraphQlResponse {
    /// Extract the repository node, turning GraphQL-level errors into failures.
    pub fn into_repository(self, owner: &str, repo: &str) -> Result<RepositoryNode> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
            bail!("GitHub rejected the query for '{owner}/{repo}': {}", messages.join("; "));
        }

        match self.data.and_then(|data| data.repository) {
            Some(repository) => Ok(repository),
            None => bail!("repository '{owner}/{repo}' not found"),
        }
    }
}

impl RepositoryNode {
    /// Build a dataset from the repository node and the separately fetched contributor counts.
    #[must_use]
    pub fn into_dataset(
        self,
        owner: &str,
        repo: &str,
        captured_at: DateTime<Utc>,
        contributors: BTreeMap<String, u64>,
    ) -> RepositoryDataset {
        let mut dataset = RepositoryDataset::new(owner, repo, captured_at);

        dataset.license = self
            .license_info
            .and_then(|info| info.spdx_id)
            .filter(|id| !id.is_empty());

        dataset.readme = self.readme.or(self.readme_lower).and_then(|blob| blob.text);
        dataset.is_archived = self.is_archived;
        dataset.has_examples = self.examples_folder.is_some_and(|tree| !tree.entries.is_empty());
        dataset.contributors = contributors;

        if let Some(text) = self.package_json.and_then(|blob| blob.text) {
            match parse_manifest_dependencies(&text) {
                Ok(dependencies) => dataset.dependencies = dependencies,
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "Could not parse package.json of '{owner}/{repo}': {e:#}");
                    dataset.manifest_error = Some(format!("{e:#}"));
                }
            }
        }

        dataset.open_issue_total = self.open_issues.total_count;
        dataset.closed_issue_total = self.closed_issues.total_count;
        dataset.pull_request_total = self.pull_requests.total_count;

        dataset.open_issues = self
            .open_issues
            .nodes
            .into_iter()
            .map(|node| OpenIssue {
                created_at: node.created_at,
                updated_at: node.updated_at,
                closed_at: node.closed_at,
            })
            .collect();

        dataset.closed_issues = self
            .closed_issues
            .nodes
            .into_iter()
            .filter_map(|node| {
                let Some(closed_at) = node.closed_at else {
                    log::debug!(target: LOG_TARGET, "Skipping closed issue without a close timestamp in '{owner}/{repo}'");
                    return None;
                };

                Some(ClosedIssue {
                    created_at: node.created_at,
                    updated_at: node.updated_at,
                    closed_at,
                })
            })
            .collect();

        dataset.pull_requests = self
            .pull_requests
            .nodes
            .into_iter()
            .map(|node| PullRequest {
                created_at: node.created_at,
                updated_at: node.updated_at,
                closed_at: node.closed_at,
                merged_at: node.merged_at,
                review_count: node.reviews.map_or(0, |r| r.total_count),
                additions: node.additions,
            })
            .collect();

        dataset
    }
}

/// Extract the runtime dependency requirements from a `package.json` document.
fn parse_manifest_dependencies(text: &str) -> Result<BTreeMap<String, String>> {
    let manifest: PackageManifest = serde_json::from_str(text).into_app_err("malformed package.json")?;
    Ok(manifest.dependencies)
}
