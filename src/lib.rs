#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for pkg-rate
//!
//! This library rates open-source packages for an automated registry pipeline. It takes a
//! snapshot of a package's source repository, scores it along seven independent metrics
//! concurrently, and folds the sub-scores into a single weighted net score with a timing
//! figure for every metric.
//!
//! # Module Organization
//!
//! - [`facts`]: Repository datasets and the clients that produce them
//! - [`metrics`]: Metric kinds, outcomes, tunables, and the per-metric evaluators
//! - [`engine`]: Concurrent dispatch, per-task isolation, and score aggregation
//! - [`reports`]: Console and JSON renderings of score cards
//! - [`commands`]: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod commands;
pub mod engine;
pub mod facts;
pub mod metrics;
pub mod reports;

pub use crate::commands::{Host, run};
