use super::ScoreCard;
use crate::Result;
use crate::metrics::{MetricKind, MetricOutcome, MetricOutcomes};
use core::time::Duration;
use ohno::app_err;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Tolerance when checking that weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Relative importance of each metric in the net score.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct MetricWeights {
    pub ramp_up: f64,
    pub correctness: f64,
    pub bus_factor: f64,
    pub responsive_maintainer: f64,
    pub license_score: f64,
    pub good_pinning_practice: f64,
    pub pull_request: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            ramp_up: 0.10,
            correctness: 0.15,
            bus_factor: 0.20,
            responsive_maintainer: 0.15,
            license_score: 0.20,
            good_pinning_practice: 0.10,
            pull_request: 0.10,
        }
    }
}

impl MetricWeights {
    #[must_use]
    pub const fn weight(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::RampUp => self.ramp_up,
            MetricKind::Correctness => self.correctness,
            MetricKind::BusFactor => self.bus_factor,
            MetricKind::ResponsiveMaintainer => self.responsive_maintainer,
            MetricKind::LicenseScore => self.license_score,
            MetricKind::GoodPinningPractice => self.good_pinning_practice,
            MetricKind::PullRequest => self.pull_request,
        }
    }

    /// Sum of all weights, in canonical metric order.
    #[must_use]
    pub fn total(&self) -> f64 {
        MetricKind::iter().map(|kind| self.weight(kind)).sum()
    }

    /// Validate that weights are non-negative and sum to one
    pub fn validate(&self) -> Result<()> {
        for kind in MetricKind::iter() {
            let weight = self.weight(kind);
            if !weight.is_finite() || weight < 0.0 {
                return Err(app_err!("weight of {kind} must be a non-negative number, got {weight}"));
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(app_err!("metric weights must sum to 1.0, got {total}"));
        }

        Ok(())
    }
}

/// Fold metric outcomes into a score card.
///
/// The net score is the weighted mean of the computable sub-scores: the weight of metrics that
/// could not be computed is redistributed proportionally over the rest. When nothing carrying
/// weight could be computed, the net score is not computable either. The net latency is the
/// largest metric latency, which is what a concurrent run costs.
///
/// This is a pure function of its inputs, so aggregating the same outcomes twice yields
/// identical score cards.
#[must_use]
pub fn aggregate(outcomes: &MetricOutcomes, weights: &MetricWeights) -> ScoreCard {
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    let mut latency = Duration::ZERO;

    for kind in MetricKind::iter() {
        let Some(outcome) = outcomes.get(&kind) else {
            continue;
        };

        latency = latency.max(outcome.latency());

        if let Some(score) = outcome.score() {
            let weight = weights.weight(kind);
            weighted_sum += weight * score;
            weight_sum += weight;
        }
    }

    let net = if weight_sum > 0.0 {
        MetricOutcome::computed(weighted_sum / weight_sum, latency)
    } else {
        MetricOutcome::not_computable(latency)
    };

    ScoreCard::new(outcomes.clone(), net)
}
