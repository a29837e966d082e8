use super::days_between;
use crate::Result;
use crate::facts::RepositoryDataset;
use crate::metrics::MetricSettings;
use chrono::{DateTime, Utc};
use ohno::bail;

/// Vacuous score of a repository without any issues or pull requests.
const NO_ACTIVITY_SCORE: f64 = 0.5;

/// Score how quickly maintainers act on issues and pull requests.
///
/// The score is based on the mean span between creation and last update across all issues and
/// pull requests. It is 1 for instant activity and halves at `responsiveness_half_life_days`.
/// Archived repositories are capped at `archived_score_cap`, since nobody is going to respond.
pub fn evaluate(dataset: &RepositoryDataset, settings: &MetricSettings) -> Result<f64> {
    let spans = dataset
        .open_issues
        .iter()
        .map(|issue| (issue.created_at, issue.updated_at))
        .chain(dataset.closed_issues.iter().map(|issue| (issue.created_at, issue.updated_at)))
        .chain(dataset.pull_requests.iter().map(|pr| (pr.created_at, pr.updated_at)));

    let mut total_days = 0.0;
    let mut count = 0u32;
    for (created_at, updated_at) in spans {
        total_days += span_days(created_at, updated_at)?;
        count += 1;
    }

    let score = if count == 0 {
        NO_ACTIVITY_SCORE
    } else {
        let mean_days = total_days / f64::from(count);
        1.0 / (1.0 + mean_days / settings.responsiveness_half_life_days)
    };

    if dataset.is_archived {
        return Ok(score.min(settings.archived_score_cap));
    }

    Ok(score)
}

fn span_days(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Result<f64> {
    if updated_at < created_at {
        bail!(
            "record created at {} claims to have been updated earlier, at {}",
            created_at.to_rfc3339(),
            updated_at.to_rfc3339()
        );
    }

    Ok(days_between(created_at, updated_at))
}
