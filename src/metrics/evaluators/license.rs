use crate::Result;
use crate::facts::RepositoryDataset;
use crate::metrics::MetricSettings;
use regex::Regex;
use spdx::{Expression, LicenseItem, ParseMode};
use std::collections::HashSet;
use std::sync::LazyLock;

const LOG_TARGET: &str = "   license";

/// Matches a Markdown heading that starts a license section
static LICENSE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s{0,3}#{1,6}\s*licen[cs]e\b.*$").expect("invalid regex"));

/// Matches any Markdown heading
static ANY_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s{0,3}#{1,6}\s").expect("invalid regex"));

/// Score whether the package can be used under an allow-listed license.
///
/// The declared license is parsed as an SPDX expression and scores 1 when it can be satisfied
/// using allow-listed licenses alone. Repositories that declare no license, or only
/// `NOASSERTION`, are given a second chance through the License section of their README.
pub fn evaluate(dataset: &RepositoryDataset, settings: &MetricSettings) -> Result<f64> {
    let allowed = AllowList::new(&settings.license_allow_list);

    let declared = dataset
        .license
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty() && !id.eq_ignore_ascii_case("NOASSERTION"));

    let acceptable = match declared {
        Some(id) => allowed.admits_expression(id),
        None => dataset
            .readme
            .as_deref()
            .and_then(license_section)
            .is_some_and(|section| allowed.mentioned_in(section)),
    };

    Ok(if acceptable { 1.0 } else { 0.0 })
}

/// Extract the body of the README's License section, if it has one.
fn license_section(readme: &str) -> Option<&str> {
    let heading = LICENSE_HEADING.find(readme)?;
    let body = readme.get(heading.end()..)?;
    let end = ANY_HEADING.find(body).map_or(body.len(), |m| m.start());
    body.get(..end)
}

/// Base name of an SPDX identifier, ignoring the GNU `-only` and `-or-later` variants.
fn base_name(id: &str) -> &str {
    id.trim_end_matches('+')
        .trim_end_matches("-or-later")
        .trim_end_matches("-only")
}

struct AllowList<'a> {
    ids: &'a [String],
    names: HashSet<String>,
}

impl<'a> AllowList<'a> {
    fn new(ids: &'a [String]) -> Self {
        Self {
            ids,
            names: ids.iter().map(|id| base_name(id).to_ascii_lowercase()).collect(),
        }
    }

    fn admits(&self, id: &str) -> bool {
        self.names.contains(&base_name(id).to_ascii_lowercase())
    }

    fn admits_expression(&self, text: &str) -> bool {
        match Expression::parse_mode(text, ParseMode::LAX) {
            Ok(expression) => expression.evaluate(|req| match &req.license {
                LicenseItem::Spdx { id, .. } => self.admits(id.name),
                _ => false,
            }),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Declared license '{text}' is not a valid SPDX expression: {e}");
                self.admits(text)
            }
        }
    }

    fn mentioned_in(&self, section: &str) -> bool {
        let section_lower = section.to_ascii_lowercase();

        let mentions_token = section
            .split(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+')))
            .map(|token| token.trim_end_matches('.'))
            .any(|token| !token.is_empty() && self.admits(token));

        mentions_token
            || self.ids.iter().any(|id| {
                spdx::license_id(id).is_some_and(|license| section_lower.contains(&license.full_name.to_ascii_lowercase()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::evaluators::test_support::dataset;

    fn score(license: Option<&str>, readme: Option<&str>) -> f64 {
        let mut dataset = dataset();
        dataset.license = license.map(String::from);
        dataset.readme = readme.map(String::from);
        evaluate(&dataset, &MetricSettings::default()).unwrap()
    }

    #[test]
    fn test_allow_listed_identifier() {
        assert!((score(Some("MIT"), None) - 1.0).abs() < f64::EPSILON);
        assert!((score(Some("Apache-2.0"), None) - 1.0).abs() < f64::EPSILON);
        assert!((score(Some("LGPL-2.1-or-later"), None) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_other_identifier() {
        assert!(score(Some("GPL-3.0-only"), None).abs() < f64::EPSILON);
        assert!(score(Some("AGPL-3.0-only"), None).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expressions() {
        assert!((score(Some("MIT OR GPL-3.0-only"), None) - 1.0).abs() < f64::EPSILON);
        assert!((score(Some("MIT AND ISC"), None) - 1.0).abs() < f64::EPSILON);
        assert!(score(Some("MIT AND GPL-3.0-only"), None).abs() < f64::EPSILON);
    }

    #[test]
    fn test_garbage_identifier() {
        assert!(score(Some("see LICENSE file"), None).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_license_no_readme() {
        assert!(score(None, None).abs() < f64::EPSILON);
        assert!(score(Some("NOASSERTION"), None).abs() < f64::EPSILON);
    }

    #[test]
    fn test_readme_license_section_with_identifier() {
        let readme = "# Tool\n\nDoes things.\n\n## License\n\nReleased under the MIT license.\n\n## Contributing\n\nGPL-3.0 forks welcome.\n";
        assert!((score(None, Some(readme)) - 1.0).abs() < f64::EPSILON);
        assert!((score(Some("NOASSERTION"), Some(readme)) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_readme_license_section_with_full_name() {
        let readme = "# Tool\n\n## Licence\n\nThis project uses the ISC License terms.\n";
        assert!((score(None, Some(readme)) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_readme_license_section_with_other_license() {
        let readme = "# Tool\n\n## License\n\nGPL-3.0-only\n\n## Credits\n\nThanks to the MIT folks.\n";
        assert!(score(None, Some(readme)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_readme_without_license_section() {
        let readme = "# Tool\n\nMIT is mentioned here but not in a license section.\n";
        assert!(score(None, Some(readme)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_declared_license_wins_over_readme() {
        let readme = "## License\n\nMIT\n";
        assert!(score(Some("GPL-3.0-only"), Some(readme)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("LGPL-2.1-only"), "LGPL-2.1");
        assert_eq!(base_name("LGPL-2.1-or-later"), "LGPL-2.1");
        assert_eq!(base_name("LGPL-2.1+"), "LGPL-2.1");
        assert_eq!(base_name("MIT"), "MIT");
    }
}
