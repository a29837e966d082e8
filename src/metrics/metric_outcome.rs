use super::MetricKind;
use core::time::Duration;
use std::collections::BTreeMap;

/// Wire value of a score that could not be computed.
pub const NOT_COMPUTABLE: f64 = -1.0;

/// The result of evaluating one metric: a score, unless evaluation failed, and how long it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricOutcome {
    score: Option<f64>,
    latency: Duration,
}

/// Outcomes of a run keyed by the metric that produced them.
pub type MetricOutcomes = BTreeMap<MetricKind, MetricOutcome>;

impl MetricOutcome {
    /// A successfully computed score.
    ///
    /// Scores are expected in `[0, 1]`; anything else is clamped so the outcome can never carry
    /// an out-of-range value.
    #[must_use]
    pub const fn computed(score: f64, latency: Duration) -> Self {
        Self {
            score: Some(score.clamp(0.0, 1.0)),
            latency,
        }
    }

    #[must_use]
    pub const fn not_computable(latency: Duration) -> Self {
        Self { score: None, latency }
    }

    /// The score, or `None` if the metric could not be computed.
    #[must_use]
    pub const fn score(&self) -> Option<f64> {
        self.score
    }

    #[must_use]
    pub const fn is_computable(&self) -> bool {
        self.score.is_some()
    }

    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    /// The score as it appears on the wire, with [`NOT_COMPUTABLE`] standing in for a missing score.
    #[must_use]
    pub fn wire_score(&self) -> f64 {
        self.score.unwrap_or(NOT_COMPUTABLE)
    }

    /// Latency in fractional seconds.
    #[must_use]
    pub const fn latency_secs(&self) -> f64 {
        self.latency.as_secs_f64()
    }
}
