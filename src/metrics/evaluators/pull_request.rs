use crate::Result;
use crate::facts::RepositoryDataset;
use crate::metrics::MetricSettings;

/// Score the share of merged code that was reviewed before landing.
///
/// Reviewed share is measured in lines added across merged pull requests. When no merged pull
/// request reports any additions, the share of reviewed pull requests is used instead.
#[expect(clippy::cast_precision_loss, reason = "line and pull request counts are far below 2^52")]
pub fn evaluate(dataset: &RepositoryDataset, _settings: &MetricSettings) -> Result<f64> {
    let mut merged = 0u64;
    let mut reviewed = 0u64;
    let mut additions = 0u64;
    let mut reviewed_additions = 0u64;

    for pr in dataset.pull_requests.iter().filter(|pr| pr.is_merged()) {
        merged += 1;
        additions = additions.saturating_add(pr.additions);

        if pr.is_reviewed() {
            reviewed += 1;
            reviewed_additions = reviewed_additions.saturating_add(pr.additions);
        }
    }

    if merged == 0 {
        return Ok(0.0);
    }

    if additions == 0 {
        return Ok(reviewed as f64 / merged as f64);
    }

    Ok(reviewed_additions as f64 / additions as f64)
}
