use crate::facts::RepositoryDataset;
use crate::metrics::{Evaluator, MetricKind, MetricOutcome};
use core::any::Any;
use core::panic::AssertUnwindSafe;
use core::time::Duration;
use std::sync::Arc;
use std::time::Instant;

const LOG_TARGET: &str = "    runner";

/// Run one evaluator in isolation and time it.
///
/// The evaluator runs on the blocking thread pool so that metrics execute in parallel. Whatever
/// the evaluator does, this returns an outcome: errors, panics, scores outside `[0, 1]`, and
/// overrunning `timeout` all yield a non-computable outcome and a warning in the log. The
/// latency is measured around the evaluator call itself, or up to the deadline on timeout.
pub async fn run_task(
    kind: MetricKind,
    evaluator: Arc<dyn Evaluator>,
    dataset: Arc<RepositoryDataset>,
    timeout: Option<Duration>,
) -> MetricOutcome {
    let started = Instant::now();

    let handle = tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(&dataset)));
        (result, start.elapsed())
    });

    let joined = match timeout {
        Some(limit) => {
            // The blocking thread cannot be cancelled and keeps running detached. Runtime
            // shutdown waits for it unless bounded with `Runtime::shutdown_timeout`.
            let Ok(joined) = tokio::time::timeout(limit, handle).await else {
                log::warn!(target: LOG_TARGET, "Metric {kind} did not complete within {limit:?}");
                return MetricOutcome::not_computable(started.elapsed());
            };
            joined
        }
        None => handle.await,
    };

    let (result, latency) = match joined {
        Ok(joined) => joined,
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Metric {kind} could not be run: {e}");
            return MetricOutcome::not_computable(started.elapsed());
        }
    };

    match result {
        Ok(Ok(score)) if score.is_finite() && (0.0..=1.0).contains(&score) => {
            log::debug!(target: LOG_TARGET, "Metric {kind} scored {score:.3} in {latency:?}");
            MetricOutcome::computed(score, latency)
        }
        Ok(Ok(score)) => {
            log::warn!(target: LOG_TARGET, "Metric {kind} produced out-of-range score {score}");
            MetricOutcome::not_computable(latency)
        }
        Ok(Err(e)) => {
            log::warn!(target: LOG_TARGET, "Metric {kind} could not be computed: {e:#}");
            MetricOutcome::not_computable(latency)
        }
        Err(payload) => {
            log::warn!(target: LOG_TARGET, "Metric {kind} panicked: {}", panic_message(payload.as_ref()));
            MetricOutcome::not_computable(latency)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic payload"
    }
}
