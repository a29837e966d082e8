use crate::metrics::{MetricKind, MetricOutcome, MetricOutcomes};
use core::time::Duration;
use serde::{Serialize, Serializer};
use strum::IntoEnumIterator;

/// The complete rating of one package: an outcome per metric plus the net score.
///
/// On the wire a score card is a flat object of sixteen numbers, a score and a latency in
/// seconds for each metric and for the net score, with `-1` standing in for scores that could
/// not be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    metrics: MetricOutcomes,
    net: MetricOutcome,
}

impl ScoreCard {
    /// Assemble a score card. Metrics missing from `metrics` are recorded as not computable.
    #[must_use]
    pub fn new(mut metrics: MetricOutcomes, net: MetricOutcome) -> Self {
        for kind in MetricKind::iter() {
            let _ = metrics.entry(kind).or_insert(MetricOutcome::not_computable(Duration::ZERO));
        }

        Self { metrics, net }
    }

    /// The outcome of a single metric.
    #[must_use]
    pub fn metric(&self, kind: MetricKind) -> MetricOutcome {
        self.metrics
            .get(&kind)
            .copied()
            .unwrap_or(MetricOutcome::not_computable(Duration::ZERO))
    }

    /// All metric outcomes in canonical order.
    pub fn metrics(&self) -> impl Iterator<Item = (MetricKind, MetricOutcome)> + '_ {
        self.metrics.iter().map(|(kind, outcome)| (*kind, *outcome))
    }

    /// The net score outcome; its latency is the slowest metric's latency.
    #[must_use]
    pub const fn net(&self) -> MetricOutcome {
        self.net
    }

    #[must_use]
    pub const fn net_score(&self) -> Option<f64> {
        self.net.score()
    }

    fn to_wire(&self) -> WireScoreCard {
        let score = |kind| self.metric(kind).wire_score();
        let latency = |kind| self.metric(kind).latency_secs();

        WireScoreCard {
            ramp_up: score(MetricKind::RampUp),
            ramp_up_latency: latency(MetricKind::RampUp),
            correctness: score(MetricKind::Correctness),
            correctness_latency: latency(MetricKind::Correctness),
            bus_factor: score(MetricKind::BusFactor),
            bus_factor_latency: latency(MetricKind::BusFactor),
            responsive_maintainer: score(MetricKind::ResponsiveMaintainer),
            responsive_maintainer_latency: latency(MetricKind::ResponsiveMaintainer),
            license_score: score(MetricKind::LicenseScore),
            license_score_latency: latency(MetricKind::LicenseScore),
            good_pinning_practice: score(MetricKind::GoodPinningPractice),
            good_pinning_practice_latency: latency(MetricKind::GoodPinningPractice),
            pull_request: score(MetricKind::PullRequest),
            pull_request_latency: latency(MetricKind::PullRequest),
            net_score: self.net.wire_score(),
            net_score_latency: self.net.latency_secs(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireScoreCard {
    ramp_up: f64,
    ramp_up_latency: f64,
    correctness: f64,
    correctness_latency: f64,
    bus_factor: f64,
    bus_factor_latency: f64,
    responsive_maintainer: f64,
    responsive_maintainer_latency: f64,
    license_score: f64,
    license_score_latency: f64,
    good_pinning_practice: f64,
    good_pinning_practice_latency: f64,
    pull_request: f64,
    pull_request_latency: f64,
    net_score: f64,
    net_score_latency: f64,
}

impl Serialize for ScoreCard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScoreCard {
        let mut metrics = MetricOutcomes::new();
        let _ = metrics.insert(MetricKind::RampUp, MetricOutcome::computed(0.5, Duration::from_millis(1500)));
        let _ = metrics.insert(MetricKind::LicenseScore, MetricOutcome::not_computable(Duration::from_millis(250)));
        ScoreCard::new(metrics, MetricOutcome::computed(0.5, Duration::from_millis(1500)))
    }

    #[test]
    fn test_missing_metrics_are_not_computable() {
        let card = sample();
        assert_eq!(card.metrics().count(), 7);
        assert!(!card.metric(MetricKind::BusFactor).is_computable());
        assert_eq!(card.metric(MetricKind::BusFactor).latency(), Duration::ZERO);
    }

    #[test]
    fn test_wire_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();

        let mut expected = Vec::new();
        for kind in MetricKind::iter() {
            expected.push(kind.field().to_string());
            expected.push(kind.latency_field().to_string());
        }
        expected.push("NetScore".to_string());
        expected.push("NetScoreLatency".to_string());

        let mut actual: Vec<_> = object.keys().cloned().collect();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_wire_values() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["RampUp"], 0.5);
        assert_eq!(value["RampUpLatency"], 1.5);
        assert_eq!(value["LicenseScore"], -1.0);
        assert_eq!(value["LicenseScoreLatency"], 0.25);
        assert_eq!(value["BusFactor"], -1.0);
        assert_eq!(value["NetScore"], 0.5);
        assert_eq!(value["NetScoreLatency"], 1.5);
    }
}
