use super::days_between;
use crate::Result;
use crate::facts::RepositoryDataset;
use crate::metrics::MetricSettings;
use ohno::bail;

/// Vacuous score of a repository without any issues.
const NO_ISSUES_SCORE: f64 = 0.5;

/// Weight of a closed issue whose close date is unknown.
const STALE_CLOSE_WEIGHT: f64 = 0.5;

/// Score the share of reported issues that have been resolved.
///
/// Every open issue weighs 1. A closed issue weighs between 0.5 and 1, decaying with the time
/// since it was closed so that recent fixes count more than old ones.
///
/// The issue records may be a sample of a larger repository. The mean weight of the sampled
/// closed issues then stands for every closed issue, and the reported open issue count is used
/// as is.
#[expect(clippy::cast_precision_loss, reason = "issue counts are far below 2^52")]
pub fn evaluate(dataset: &RepositoryDataset, settings: &MetricSettings) -> Result<f64> {
    if dataset.issue_count() == 0 {
        return Ok(NO_ISSUES_SCORE);
    }

    let mut sampled_weight = 0.0;
    for issue in &dataset.closed_issues {
        if issue.closed_at < issue.created_at {
            bail!(
                "closed issue created at {} claims to have been closed earlier, at {}",
                issue.created_at.to_rfc3339(),
                issue.closed_at.to_rfc3339()
            );
        }

        let days_since_close = days_between(issue.closed_at, dataset.captured_at).max(0.0);
        sampled_weight += 0.5f64.mul_add((-days_since_close / settings.correctness_recency_days).exp(), 0.5);
    }

    let mean_closed_weight = if dataset.closed_issues.is_empty() {
        STALE_CLOSE_WEIGHT
    } else {
        sampled_weight / dataset.closed_issues.len() as f64
    };

    let closed_weight = mean_closed_weight * dataset.closed_issue_count() as f64;
    let open_weight = dataset.open_issue_count() as f64;

    Ok(closed_weight / (closed_weight + open_weight))
}
