use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::engine::{Rater, ScoreCard};
use crate::facts::{GitHubClient, RepoSpec, RepositoryClient, SnapshotClient, save_snapshot};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use futures_util::future::join_all;
use ohno::app_err;
use std::sync::Arc;

const LOG_TARGET: &str = "      rate";

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Parser, Debug)]
pub struct RateArgs {
    /// Repository URLs of the packages to rate (e.g. `https://github.com/owner/repo`)
    #[arg(value_name = "URL", required = true)]
    pub urls: Vec<String>,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long, value_name = "URL", default_value = DEFAULT_GITHUB_API_URL)]
    pub github_api_url: String,

    /// Read repository snapshots from `<PATH>/<owner>/<repo>.json` instead of querying GitHub
    #[arg(long, value_name = "PATH")]
    pub snapshot_dir: Option<Utf8PathBuf>,

    /// Save the fetched repository data as snapshots under `<PATH>/<owner>/<repo>.json`
    #[arg(long, value_name = "PATH")]
    pub save_snapshots: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_rate<H: Host>(host: &mut H, args: &RateArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let rater = common.rater();

    let save_dir = args.save_snapshots.as_deref();

    let ratings = if let Some(dir) = &args.snapshot_dir {
        rate_all(&SnapshotClient::new(dir.clone()), &rater, &args.urls, save_dir).await
    } else {
        let client = GitHubClient::with_base_url(args.github_token.as_deref(), &args.github_api_url)?;
        rate_all(&client, &rater, &args.urls, save_dir).await
    };

    common.report(ratings)
}

/// Fetch and rate every package concurrently, preserving the input order.
///
/// With `save_dir`, every fetched dataset is also written there in the layout [`SnapshotClient`] reads.
pub async fn rate_all<C: RepositoryClient>(
    client: &C,
    rater: &Rater,
    urls: &[String],
    save_dir: Option<&Utf8Path>,
) -> Vec<(String, Result<ScoreCard>)> {
    join_all(urls.iter().map(|url| async move {
        match RepoSpec::parse(url) {
            Ok(spec) => {
                let rating = rate_one(client, rater, &spec, save_dir).await;
                (spec.url().to_string(), rating)
            }
            Err(e) => (url.clone(), Err(e)),
        }
    }))
    .await
}

async fn rate_one<C: RepositoryClient>(client: &C, rater: &Rater, spec: &RepoSpec, save_dir: Option<&Utf8Path>) -> Result<ScoreCard> {
    let dataset = client.fetch(spec).await?;

    if let Some(dir) = save_dir {
        save_snapshot(&dataset, SnapshotClient::new(dir).snapshot_path(spec))?;
    }

    log::info!(target: LOG_TARGET, "Rating '{spec}' ({} issues, {} pull requests)", dataset.issue_count(), dataset.pull_request_count());

    rater
        .rate(Some(Arc::new(dataset)))
        .await
        .ok_or_else(|| app_err!("the repository data for '{spec}' is unusable"))
}
