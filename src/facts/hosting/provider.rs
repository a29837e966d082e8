use super::client::{Client, HostingApiResult};
use super::graphql::{GraphQlRequest, GraphQlResponse, REPOSITORY_QUERY, Variables};
use crate::Result;
use crate::facts::{RepoSpec, RepositoryClient, RepositoryDataset};
use chrono::Utc;
use ohno::{EnrichableExt, IntoAppError};
use reqwest::header::LINK;
use serde::Deserialize;
use std::collections::BTreeMap;

const LOG_TARGET: &str = "   hosting";
const GITHUB_API_URL: &str = "https://api.github.com";
const CONTRIBUTORS_PAGE_SIZE: u8 = 100;
const MAX_CONTRIBUTOR_PAGES: u32 = 10;

/// Entry of the REST contributors listing.
#[derive(Debug, Deserialize)]
struct Contributor {
    login: Option<String>,
    contributions: u64,
}

/// Fetches repository datasets from GitHub.
///
/// Repository fields, issues, pull requests, README, examples directory and `package.json` come
/// from a single GraphQL query. Commit counts per contributor come from the REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
}

impl GitHubClient {
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_base_url(token, GITHUB_API_URL)
    }

    /// Create a client talking to a GitHub-compatible API at the given base URL.
    pub fn with_base_url(token: Option<&str>, base_url: impl Into<String>) -> Result<Self> {
        if token.is_none() {
            log::warn!(target: LOG_TARGET, "No GitHub token provided, the GraphQL API will likely reject requests");
        }

        Ok(Self {
            client: Client::new(token, base_url)?,
        })
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<super::graphql::RepositoryNode> {
        let request = GraphQlRequest {
            query: REPOSITORY_QUERY,
            variables: Variables { owner, name: repo },
        };

        let resp = self
            .client
            .post_json("/graphql", &request)
            .await
            .into_result(format!("repository data for '{owner}/{repo}'"))?;

        let response: GraphQlResponse = resp
            .json()
            .await
            .into_app_err_with(|| format!("malformed GraphQL response for '{owner}/{repo}'"))?;

        response.into_repository(owner, repo)
    }

    async fn get_contributors(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>> {
        let mut result = BTreeMap::new();
        let mut page_num = 1u32;

        loop {
            let path = format!("/repos/{owner}/{repo}/contributors?per_page={CONTRIBUTORS_PAGE_SIZE}&page={page_num}");

            let resp = match self.client.get(&path).await {
                // Empty repositories answer with 204 and no body
                HostingApiResult::Success(resp, _) if resp.status() == reqwest::StatusCode::NO_CONTENT => break,
                other => other.into_result(format!("contributors of '{owner}/{repo}'"))?,
            };

            let has_next_page = resp
                .headers()
                .get(LINK)
                .and_then(|h| h.to_str().ok())
                .is_some_and(|link_str| link_str.contains(r#"rel="next""#));

            let contributors: Vec<Contributor> = resp
                .json()
                .await
                .into_app_err_with(|| format!("malformed contributors response for '{owner}/{repo}'"))?;

            if contributors.is_empty() {
                break;
            }

            for contributor in contributors {
                if let Some(login) = contributor.login {
                    *result.entry(login).or_insert(0) += contributor.contributions;
                }
            }

            if !has_next_page {
                break;
            }

            if page_num >= MAX_CONTRIBUTOR_PAGES {
                log::debug!(target: LOG_TARGET, "Reached maximum contributor page limit ({MAX_CONTRIBUTOR_PAGES}) for '{owner}/{repo}', stopping pagination after {} contributors", result.len());
                break;
            }

            page_num += 1;
        }

        Ok(result)
    }
}

impl RepositoryClient for GitHubClient {
    async fn fetch(&self, repo_spec: &RepoSpec) -> Result<RepositoryDataset> {
        let owner = repo_spec.owner();
        let repo = repo_spec.repo();

        log::info!(target: LOG_TARGET, "Querying GitHub for repository '{repo_spec}'");

        let captured_at = Utc::now();
        let (repository_res, contributors_res) = tokio::join!(self.get_repository(owner, repo), self.get_contributors(owner, repo));

        let repository =
            repository_res.map_err(|e| e.enrich_with(|| format!("could not fetch repository data for '{repo_spec}'")))?;
        let contributors =
            contributors_res.map_err(|e| e.enrich_with(|| format!("could not fetch contributors for '{repo_spec}'")))?;

        log::debug!(target: LOG_TARGET, "Completed GitHub API requests for repository '{repo_spec}'");

        Ok(repository.into_dataset(owner, repo, captured_at, contributors))
    }
}
