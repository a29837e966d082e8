use crate::engine::ScoreCard;

/// A package as it appears in reports.
#[derive(Debug, Clone)]
pub struct RatedPackage {
    /// Where the package's repository lives, or the snapshot it was loaded from.
    pub url: String,

    /// The rating, or `None` when no usable dataset could be obtained.
    pub card: Option<ScoreCard>,
}

impl RatedPackage {
    #[must_use]
    pub fn new(url: impl Into<String>, card: Option<ScoreCard>) -> Self {
        Self { url: url.into(), card }
    }

    /// Whether this package clears the given net score threshold.
    ///
    /// Unrated packages and packages whose net score could not be computed never pass.
    #[must_use]
    pub fn passes(&self, min_net_score: f64) -> bool {
        self.card
            .as_ref()
            .and_then(ScoreCard::net_score)
            .is_some_and(|score| score >= min_net_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricOutcome, MetricOutcomes};
    use core::time::Duration;

    fn card(net: MetricOutcome) -> ScoreCard {
        ScoreCard::new(MetricOutcomes::new(), net)
    }

    #[test]
    fn test_passes() {
        let package = RatedPackage::new("https://github.com/a/b", Some(card(MetricOutcome::computed(0.6, Duration::ZERO))));
        assert!(package.passes(0.5));
        assert!(package.passes(0.6));
        assert!(!package.passes(0.7));
    }

    #[test]
    fn test_unrated_never_passes() {
        assert!(!RatedPackage::new("https://github.com/a/b", None).passes(0.0));

        let package = RatedPackage::new("https://github.com/a/b", Some(card(MetricOutcome::not_computable(Duration::ZERO))));
        assert!(!package.passes(0.0));
    }
}
