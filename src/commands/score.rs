use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::engine::{Rater, ScoreCard};
use crate::facts::load_snapshot;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use futures_util::future::join_all;
use ohno::app_err;
use std::sync::Arc;

#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Repository snapshot files to score
    #[arg(value_name = "SNAPSHOT", required = true)]
    pub snapshots: Vec<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_score<H: Host>(host: &mut H, args: &ScoreArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let rater = common.rater();

    let ratings = join_all(args.snapshots.iter().map(|path| score_snapshot(&rater, path))).await;
    common.report(ratings)
}

/// Score one snapshot file, labelled with its repository URL when it can be read.
async fn score_snapshot(rater: &Rater, path: &Utf8Path) -> (String, Result<ScoreCard>) {
    let dataset = match load_snapshot(path) {
        Ok(dataset) => dataset,
        Err(e) => return (path.to_string(), Err(e)),
    };

    let label = format!("https://github.com/{}/{}", dataset.owner, dataset.repo);
    let rating = rater
        .rate(Some(Arc::new(dataset)))
        .await
        .ok_or_else(|| app_err!("snapshot '{path}' does not describe a usable repository"));

    (label, rating)
}
