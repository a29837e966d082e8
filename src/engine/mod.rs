//! Concurrent metric execution and aggregation
//!
//! Rating a package proceeds in a fixed sequence of [`RunPhase`]s. The [`Dispatcher`] starts
//! one task per metric over a shared, read-only dataset; every task completes with an outcome
//! even when its evaluator fails, panics, or overruns its time limit. Once every outcome is in,
//! [`aggregate`] folds them into a [`ScoreCard`] using the configured [`MetricWeights`].
//!
//! A failing metric never aborts the run: it is recorded as not computable and its weight is
//! redistributed over the metrics that did compute.

mod aggregator;
mod dispatcher;
mod rater;
mod run_phase;
mod score_card;
mod task_runner;

pub use aggregator::{MetricWeights, aggregate};
pub use dispatcher::{Dispatcher, PendingOutcomes};
pub use rater::Rater;
pub use run_phase::RunPhase;
pub use score_card::ScoreCard;
pub use task_runner::run_task;
