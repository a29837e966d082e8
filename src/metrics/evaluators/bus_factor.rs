use crate::Result;
use crate::facts::RepositoryDataset;
use crate::metrics::MetricSettings;

/// Score how well the project would survive losing its most active contributor.
///
/// The score falls as the top contributor's share of commits grows: a single contributor
/// scores 0, and commits spread evenly over at least `bus_factor_target_contributors` people
/// score 1.
#[expect(clippy::cast_precision_loss, reason = "commit counts are far below 2^52")]
pub fn evaluate(dataset: &RepositoryDataset, settings: &MetricSettings) -> Result<f64> {
    let (total, top) = dataset
        .contributors
        .values()
        .filter(|&&commits| commits > 0)
        .fold((0u64, 0u64), |(total, top), &commits| (total.saturating_add(commits), top.max(commits)));

    if total == 0 {
        return Ok(0.0);
    }

    let top_share = top as f64 / total as f64;
    let target = f64::from(settings.bus_factor_target_contributors);
    let score = (1.0 - top_share) / (1.0 - 1.0 / target);

    Ok(score.clamp(0.0, 1.0))
}
