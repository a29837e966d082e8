use super::{Dispatcher, MetricWeights, RunPhase, ScoreCard, aggregate};
use crate::facts::RepositoryDataset;
use std::sync::Arc;

const LOG_TARGET: &str = "     rater";

/// Rates one package at a time: dispatch, collect, aggregate.
#[derive(Debug, Clone)]
pub struct Rater {
    dispatcher: Dispatcher,
    weights: MetricWeights,
}

impl Rater {
    #[must_use]
    pub const fn new(dispatcher: Dispatcher, weights: MetricWeights) -> Self {
        Self { dispatcher, weights }
    }

    #[must_use]
    pub const fn weights(&self) -> &MetricWeights {
        &self.weights
    }

    /// Produce the score card for a dataset.
    ///
    /// Returns `None` when there is no usable dataset; in that case no metric work is started.
    pub async fn rate(&self, dataset: Option<Arc<RepositoryDataset>>) -> Option<ScoreCard> {
        let mut phase = RunPhase::Idle;
        let name = dataset.as_ref().map(ToString::to_string);

        phase = advance(phase, name.as_deref());
        let pending = self.dispatcher.dispatch(dataset)?;

        phase = advance(phase, name.as_deref());
        let outcomes = pending.collect().await;

        phase = advance(phase, name.as_deref());
        let card = aggregate(&outcomes, &self.weights);

        let _ = advance(phase, name.as_deref());
        Some(card)
    }
}

fn advance(phase: RunPhase, name: Option<&str>) -> RunPhase {
    let next = phase.next().unwrap_or(phase);
    log::debug!(target: LOG_TARGET, "{}: {phase} -> {next}", name.unwrap_or("<none>"));
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::metrics::{MetricKind, MetricSettings};
    use chrono::{TimeZone, Utc};
    use strum::IntoEnumIterator;

    fn rater() -> Rater {
        Rater::new(Dispatcher::new(MetricSettings::default(), None), MetricWeights::default())
    }

    #[tokio::test]
    async fn test_absent_dataset() {
        assert!(rater().rate(None).await.is_none());
    }

    #[tokio::test]
    async fn test_rate_produces_full_card() {
        let dataset = Arc::new(RepositoryDataset::new("owner", "repo", Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
        let card = rater().rate(Some(dataset)).await.unwrap();

        assert_eq!(card.metrics().count(), 7);
        let net = card.net_score().unwrap();
        assert!((0.0..=1.0).contains(&net));
    }

    #[tokio::test]
    async fn test_rate_with_replaced_evaluator() {
        let dispatcher = Dispatcher::new(MetricSettings::default(), None);
        let dispatcher = MetricKind::iter().fold(dispatcher, |d, kind| {
            d.with_evaluator(kind, Arc::new(|_: &RepositoryDataset| -> Result<f64> { Ok(0.25) }))
        });

        let rater = Rater::new(dispatcher, MetricWeights::default());
        let dataset = Arc::new(RepositoryDataset::new("owner", "repo", Utc::now()));
        let card = rater.rate(Some(dataset)).await.unwrap();

        assert!((card.net_score().unwrap() - 0.25).abs() < 1e-9);
    }
}
