use crate::Result;
use crate::facts::RepositoryDataset;
use crate::metrics::MetricSettings;
use ohno::bail;
use semver::{Comparator, Op, VersionReq};

const LOG_TARGET: &str = "   pinning";

/// Score the share of dependencies pinned to a single `major.minor` release line.
///
/// Requirements are read with npm semantics: a bare version is exact, `x` and `*` are
/// wildcards, and space-separated comparators must all hold. Requirements that cannot be
/// read this way, such as tags, URLs, or `||` unions, count as not pinned. A package without
/// dependencies is trivially well pinned, but a manifest that could not be read is a defect.
#[expect(clippy::cast_precision_loss, reason = "dependency counts are far below 2^52")]
pub fn evaluate(dataset: &RepositoryDataset, _settings: &MetricSettings) -> Result<f64> {
    if let Some(error) = &dataset.manifest_error {
        bail!("the package manifest of '{dataset}' is unreadable: {error}");
    }

    if dataset.dependencies.is_empty() {
        return Ok(1.0);
    }

    let pinned = dataset
        .dependencies
        .iter()
        .filter(|(name, requirement)| {
            let pinned = to_version_req(requirement).is_some_and(|req| is_pinned(&req));
            log::trace!(target: LOG_TARGET, "Dependency '{name}' with requirement '{requirement}' pinned: {pinned}");
            pinned
        })
        .count();

    Ok(pinned as f64 / dataset.dependencies.len() as f64)
}

/// Translate an npm version range into a semver requirement.
fn to_version_req(requirement: &str) -> Option<VersionReq> {
    let requirement = requirement.trim();
    if requirement.is_empty() || requirement.contains("||") || requirement.contains(':') || requirement.contains('/') {
        return None;
    }

    let tokens: Vec<&str> = requirement.split_whitespace().collect();

    let comparators: Vec<String> = match tokens.as_slice() {
        // Hyphen range
        [low, "-", high] => vec![format!(">={}", normalize_version(low)?), format!("<={}", normalize_version(high)?)],
        _ => tokens.iter().copied().map(normalize_comparator).collect::<Option<_>>()?,
    };

    VersionReq::parse(&comparators.join(", ")).ok()
}

/// Rewrite one npm comparator in the form the `semver` crate expects.
fn normalize_comparator(token: &str) -> Option<String> {
    let op_len = token.find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^')).unwrap_or(token.len());
    let (op, version) = token.split_at(op_len);
    let version = normalize_version(version)?;

    if version == "*" {
        return Some(version);
    }

    Some(match op {
        // A bare npm version is an exact match, unlike in `semver` where it means caret
        "" => format!("={version}"),
        "~>" => format!("~{version}"),
        _ => format!("{op}{version}"),
    })
}

/// Strip a leading `v` and truncate at the first wildcard component.
fn normalize_version(version: &str) -> Option<String> {
    let version = version.trim_start_matches(['v', 'V']);
    if version.is_empty() {
        return None;
    }

    let concrete: Vec<&str> = version
        .split('.')
        .take_while(|part| !matches!(*part, "x" | "X" | "*"))
        .collect();

    if concrete.is_empty() {
        return Some("*".to_string());
    }

    if !concrete.first()?.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some(concrete.join("."))
}

/// Whether every version admitted by the requirement shares one `major.minor`.
fn is_pinned(req: &VersionReq) -> bool {
    if req.comparators.iter().any(pins_on_its_own) {
        return true;
    }

    // Otherwise look for an explicit lower and upper bound closing the same release line
    let lower = req
        .comparators
        .iter()
        .filter(|c| matches!(c.op, Op::GreaterEq | Op::Greater))
        .map(|c| (c.major, c.minor.unwrap_or(0)))
        .max();

    let Some((major, minor)) = lower else {
        return false;
    };

    req.comparators.iter().any(|c| match c.op {
        Op::LessEq => c.major == major && c.minor == Some(minor),
        Op::Less => {
            let upper = (c.major, c.minor.unwrap_or(0), c.patch.unwrap_or(0));
            upper <= (major, minor.saturating_add(1), 0) && upper > (major, minor, 0)
        }
        _ => false,
    })
}

fn pins_on_its_own(comparator: &Comparator) -> bool {
    match comparator.op {
        Op::Exact | Op::Tilde | Op::Wildcard => comparator.minor.is_some(),
        Op::Caret => comparator.major == 0 && comparator.minor.is_some(),
        _ => false,
    }
}
