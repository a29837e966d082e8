use super::task_runner::run_task;
use crate::facts::RepositoryDataset;
use crate::metrics::{Evaluator, MetricKind, MetricOutcome, MetricOutcomes, MetricSettings, standard_evaluators};
use core::fmt::{Debug, Formatter};
use core::time::Duration;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

const LOG_TARGET: &str = "dispatcher";

/// Fans a dataset out to one task per metric and collects the outcomes.
///
/// The dispatcher holds exactly one evaluator per [`MetricKind`]. It starts with the standard
/// evaluators; any of them can be replaced.
#[derive(Clone)]
pub struct Dispatcher {
    evaluators: BTreeMap<MetricKind, Arc<dyn Evaluator>>,
    task_timeout: Option<Duration>,
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("evaluators", &self.evaluators.keys().collect::<Vec<_>>())
            .field("task_timeout", &self.task_timeout)
            .finish()
    }
}

/// Metric tasks that have been started but not yet collected.
#[derive(Debug)]
pub struct PendingOutcomes {
    tasks: Vec<(MetricKind, JoinHandle<MetricOutcome>)>,
    dispatched_at: Instant,
}

impl Dispatcher {
    /// Create a dispatcher running the standard evaluators with the given tunables.
    #[must_use]
    pub fn new(settings: MetricSettings, task_timeout: Option<Duration>) -> Self {
        let settings = Arc::new(settings);

        Self {
            evaluators: standard_evaluators(&settings).collect(),
            task_timeout,
        }
    }

    /// Replace the evaluator of one metric.
    #[must_use]
    pub fn with_evaluator(mut self, kind: MetricKind, evaluator: Arc<dyn Evaluator>) -> Self {
        let _ = self.evaluators.insert(kind, evaluator);
        self
    }

    #[must_use]
    pub const fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout
    }

    /// Start one task per metric.
    ///
    /// Returns `None` without starting anything when there is no usable dataset. Must be called
    /// from within a tokio runtime.
    #[must_use]
    pub fn dispatch(&self, dataset: Option<Arc<RepositoryDataset>>) -> Option<PendingOutcomes> {
        let dataset = dataset?;

        if let Err(e) = dataset.validate() {
            log::warn!(target: LOG_TARGET, "Dataset is unusable: {e:#}");
            return None;
        }

        log::debug!(target: LOG_TARGET, "Dispatching {} metric tasks for '{dataset}'", self.evaluators.len());

        let dispatched_at = Instant::now();
        let tasks = self
            .evaluators
            .iter()
            .map(|(&kind, evaluator)| {
                let handle = tokio::spawn(run_task(kind, Arc::clone(evaluator), Arc::clone(&dataset), self.task_timeout));
                (kind, handle)
            })
            .collect();

        Some(PendingOutcomes { tasks, dispatched_at })
    }

    /// Compute every metric for the dataset concurrently.
    ///
    /// Returns `None` when there is no usable dataset. Otherwise the result holds exactly one
    /// outcome per metric, whether or not that metric could be computed.
    pub async fn compute_all(&self, dataset: Option<Arc<RepositoryDataset>>) -> Option<MetricOutcomes> {
        Some(self.dispatch(dataset)?.collect().await)
    }
}

impl PendingOutcomes {
    /// Wait for every task to finish.
    pub async fn collect(self) -> MetricOutcomes {
        let dispatched_at = self.dispatched_at;
        let (kinds, handles): (Vec<_>, Vec<_>) = self.tasks.into_iter().unzip();

        kinds
            .into_iter()
            .zip(join_all(handles).await)
            .map(|(kind, joined)| {
                let outcome = joined.unwrap_or_else(|e| {
                    log::warn!(target: LOG_TARGET, "Task for metric {kind} was lost: {e}");
                    MetricOutcome::not_computable(dispatched_at.elapsed())
                });
                (kind, outcome)
            })
            .collect()
    }
}
