//! Metric kinds, outcomes, and evaluators
//!
//! A package is scored along seven independent dimensions, each identified by a
//! [`MetricKind`]. For every kind there is an [`Evaluator`] that turns a repository dataset
//! into a sub-score in `[0, 1]`. The standard evaluators are tuned through [`MetricSettings`].
//!
//! Evaluating a metric yields a [`MetricOutcome`]: the score, or nothing if the metric could
//! not be computed, together with the time the evaluation took. Outcomes that are not
//! computable surface as `-1` on the wire.

mod evaluators;
mod metric_kind;
mod metric_outcome;
mod settings;

pub use evaluators::{EVALUATOR_DEFINITIONS, Evaluator, EvaluatorDef, StandardEvaluator, definition, standard_evaluators};
pub use metric_kind::MetricKind;
pub use metric_outcome::{MetricOutcome, MetricOutcomes, NOT_COMPUTABLE};
pub use settings::MetricSettings;
