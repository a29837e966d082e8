//! Metric evaluators
//!
//! An evaluator computes one sub-score in `[0, 1]` from a dataset. Evaluators are pure: they
//! perform no I/O and read the current time only through the dataset's capture timestamp, so
//! the same dataset always produces the same score. An evaluator fails only when the dataset
//! contains a defect it cannot score around, such as a record whose timestamps are out of
//! order. Empty collections are not defects; each evaluator defines a vacuous value for them.
//!
//! The standard evaluators are statically registered in [`EVALUATOR_DEFINITIONS`], one per
//! [`MetricKind`], and parameterized by [`MetricSettings`].

mod bus_factor;
mod correctness;
mod license;
mod pinning;
mod pull_request;
mod ramp_up;
mod responsive_maintainer;

use super::{MetricKind, MetricSettings};
use crate::Result;
use crate::facts::RepositoryDataset;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Computes one metric's sub-score from a dataset.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, dataset: &RepositoryDataset) -> Result<f64>;
}

impl<F> Evaluator for F
where
    F: Fn(&RepositoryDataset) -> Result<f64> + Send + Sync,
{
    fn evaluate(&self, dataset: &RepositoryDataset) -> Result<f64> {
        self(dataset)
    }
}

#[derive(Debug)]
pub struct EvaluatorDef {
    pub kind: MetricKind,
    pub description: &'static str,
    pub evaluate: fn(&RepositoryDataset, &MetricSettings) -> Result<f64>,
}

pub const EVALUATOR_DEFINITIONS: &[EvaluatorDef] = &[
    EvaluatorDef {
        kind: MetricKind::RampUp,
        description: "How quickly a new developer can get started, from README depth and examples",
        evaluate: ramp_up::evaluate,
    },
    EvaluatorDef {
        kind: MetricKind::Correctness,
        description: "Share of issues that have been resolved, favoring recent resolutions",
        evaluate: correctness::evaluate,
    },
    EvaluatorDef {
        kind: MetricKind::BusFactor,
        description: "How evenly commits are spread across contributors",
        evaluate: bus_factor::evaluate,
    },
    EvaluatorDef {
        kind: MetricKind::ResponsiveMaintainer,
        description: "How quickly issues and pull requests see activity",
        evaluate: responsive_maintainer::evaluate,
    },
    EvaluatorDef {
        kind: MetricKind::LicenseScore,
        description: "Whether the declared license is on the allow list",
        evaluate: license::evaluate,
    },
    EvaluatorDef {
        kind: MetricKind::GoodPinningPractice,
        description: "Share of dependencies pinned to a single major.minor version",
        evaluate: pinning::evaluate,
    },
    EvaluatorDef {
        kind: MetricKind::PullRequest,
        description: "Share of merged code that went through code review",
        evaluate: pull_request::evaluate,
    },
];

/// Find the standard definition of the given metric.
#[must_use]
pub fn definition(kind: MetricKind) -> Option<&'static EvaluatorDef> {
    EVALUATOR_DEFINITIONS.iter().find(|def| def.kind == kind)
}

/// A standard evaluator bound to a set of tunables.
#[derive(Debug, Clone)]
pub struct StandardEvaluator {
    def: &'static EvaluatorDef,
    settings: Arc<MetricSettings>,
}

impl StandardEvaluator {
    #[must_use]
    pub const fn new(def: &'static EvaluatorDef, settings: Arc<MetricSettings>) -> Self {
        Self { def, settings }
    }

    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        self.def.kind
    }
}

impl Evaluator for StandardEvaluator {
    fn evaluate(&self, dataset: &RepositoryDataset) -> Result<f64> {
        (self.def.evaluate)(dataset, &self.settings)
    }
}

/// Produce the standard evaluator of every metric, bound to the given tunables.
pub fn standard_evaluators(settings: &Arc<MetricSettings>) -> impl Iterator<Item = (MetricKind, Arc<dyn Evaluator>)> + '_ {
    EVALUATOR_DEFINITIONS.iter().map(|def| {
        let evaluator: Arc<dyn Evaluator> = Arc::new(StandardEvaluator::new(def, Arc::clone(settings)));
        (def.kind, evaluator)
    })
}

/// Fractional number of days from `from` to `to`, negative if `to` precedes `from`.
#[expect(clippy::cast_precision_loss, reason = "millisecond spans fit comfortably in an f64 mantissa")]
pub(crate) fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    const MILLIS_PER_DAY: f64 = 86_400_000.0;
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_one_definition_per_kind() {
        let kinds: BTreeSet<_> = EVALUATOR_DEFINITIONS.iter().map(|def| def.kind).collect();
        assert_eq!(kinds.len(), EVALUATOR_DEFINITIONS.len());

        for kind in MetricKind::iter() {
            assert!(definition(kind).is_some(), "no evaluator registered for {kind}");
        }
    }

    #[test]
    fn test_standard_evaluators_cover_every_kind() {
        let settings = Arc::new(MetricSettings::default());
        let kinds: Vec<_> = standard_evaluators(&settings).map(|(kind, _)| kind).collect();
        assert_eq!(kinds, MetricKind::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_standard_evaluators_score_empty_dataset_in_range() {
        let settings = Arc::new(MetricSettings::default());
        let dataset = test_support::dataset();

        for (kind, evaluator) in standard_evaluators(&settings) {
            let score = evaluator.evaluate(&dataset).unwrap();
            assert!((0.0..=1.0).contains(&score), "{kind} scored {score}");
        }
    }

    #[test]
    fn test_closure_is_an_evaluator() {
        let evaluator: Arc<dyn Evaluator> = Arc::new(|_: &RepositoryDataset| -> Result<f64> { Ok(0.25) });
        assert!((evaluator.evaluate(&test_support::dataset()).unwrap() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_days_between() {
        let now = test_support::captured_at();
        assert!((days_between(test_support::days_ago(3), now) - 3.0).abs() < 1e-9);
        assert!((days_between(now, test_support::days_ago(1)) + 1.0).abs() < 1e-9);
        assert!((days_between(now, now + chrono::Duration::hours(12)) - 0.5).abs() < 1e-9);
    }
}
