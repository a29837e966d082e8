use crate::Result;
use crate::facts::RepositoryDataset;
use crate::metrics::MetricSettings;

/// Score how easy it is for a newcomer to get started.
///
/// A non-blank README earns a presence credit plus a depth credit that grows with its length
/// up to `readme_target_length` characters. An examples directory earns a further credit.
pub fn evaluate(dataset: &RepositoryDataset, settings: &MetricSettings) -> Result<f64> {
    let mut score = 0.0;

    if let Some(readme) = dataset.readme.as_deref().map(str::trim).filter(|text| !text.is_empty()) {
        #[expect(clippy::cast_precision_loss, reason = "README lengths are far below 2^52")]
        let length = readme.chars().count() as f64;
        let depth = (length / f64::from(settings.readme_target_length)).min(1.0);

        score += settings.readme_depth_credit.mul_add(depth, settings.readme_presence_credit);
    }

    if dataset.has_examples {
        score += settings.examples_credit;
    }

    Ok(score.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::evaluators::test_support::dataset;

    fn score(readme: Option<&str>, has_examples: bool) -> f64 {
        let mut dataset = dataset();
        dataset.readme = readme.map(String::from);
        dataset.has_examples = has_examples;
        evaluate(&dataset, &MetricSettings::default()).unwrap()
    }

    #[test]
    fn test_nothing_is_zero() {
        assert!(score(None, false).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blank_readme_earns_nothing() {
        assert!(score(Some("   \n\t"), false).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_readme_earns_presence_and_partial_depth() {
        let readme = "x".repeat(500);
        assert!((score(Some(&readme), false) - (0.2 + 0.5 * 0.25)).abs() < 1e-9);
    }

    #[test]
    fn test_long_readme_and_examples_is_one() {
        let readme = "x".repeat(10_000);
        assert!((score(Some(&readme), true) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_examples_alone() {
        assert!((score(None, true) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let ascii = "a".repeat(1000);
        let wide = "é".repeat(1000);
        assert!((score(Some(&ascii), false) - score(Some(&wide), false)).abs() < 1e-9);
    }
}
