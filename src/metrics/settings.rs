use crate::Result;
use ohno::app_err;
use serde::{Deserialize, Serialize};

/// Tunables of the standard metric evaluators.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricSettings {
    /// Number of evenly contributing maintainers at which the bus factor is considered perfect
    #[serde(default = "default_bus_factor_target_contributors")]
    pub bus_factor_target_contributors: u32,

    /// Age in days over which a closed issue's contribution to correctness decays
    #[serde(default = "default_correctness_recency_days")]
    pub correctness_recency_days: f64,

    /// Ramp-up credit for having a non-blank README at all
    #[serde(default = "default_readme_presence_credit")]
    pub readme_presence_credit: f64,

    /// Ramp-up credit for a README of at least `readme_target_length` characters
    #[serde(default = "default_readme_depth_credit")]
    pub readme_depth_credit: f64,

    /// README length in characters that earns the full depth credit
    #[serde(default = "default_readme_target_length")]
    pub readme_target_length: u32,

    /// Ramp-up credit for having an examples directory
    #[serde(default = "default_examples_credit")]
    pub examples_credit: f64,

    /// Mean activity span in days at which responsiveness drops to one half
    #[serde(default = "default_responsiveness_half_life_days")]
    pub responsiveness_half_life_days: f64,

    /// Upper bound of the responsiveness score of an archived repository
    #[serde(default = "default_archived_score_cap")]
    pub archived_score_cap: f64,

    /// SPDX license identifiers considered acceptable
    #[serde(default = "default_license_allow_list")]
    pub license_allow_list: Vec<String>,
}

const fn default_bus_factor_target_contributors() -> u32 {
    10
}

const fn default_correctness_recency_days() -> f64 {
    90.0
}

const fn default_readme_presence_credit() -> f64 {
    0.2
}

const fn default_readme_depth_credit() -> f64 {
    0.5
}

const fn default_readme_target_length() -> u32 {
    2000
}

const fn default_examples_credit() -> f64 {
    0.3
}

const fn default_responsiveness_half_life_days() -> f64 {
    14.0
}

const fn default_archived_score_cap() -> f64 {
    0.1
}

fn default_license_allow_list() -> Vec<String> {
    [
        "MIT",
        "Apache-2.0",
        "BSD-2-Clause",
        "BSD-3-Clause",
        "ISC",
        "LGPL-2.1-only",
        "LGPL-2.1-or-later",
        "Zlib",
        "0BSD",
        "Unlicense",
        "MPL-2.0",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self {
            bus_factor_target_contributors: default_bus_factor_target_contributors(),
            correctness_recency_days: default_correctness_recency_days(),
            readme_presence_credit: default_readme_presence_credit(),
            readme_depth_credit: default_readme_depth_credit(),
            readme_target_length: default_readme_target_length(),
            examples_credit: default_examples_credit(),
            responsiveness_half_life_days: default_responsiveness_half_life_days(),
            archived_score_cap: default_archived_score_cap(),
            license_allow_list: default_license_allow_list(),
        }
    }
}

impl MetricSettings {
    /// Validate tunable values
    pub fn validate(&self) -> Result<()> {
        if self.bus_factor_target_contributors < 2 {
            return Err(app_err!(
                "bus_factor_target_contributors must be at least 2, got {}",
                self.bus_factor_target_contributors
            ));
        }

        for (name, value) in [
            ("correctness_recency_days", self.correctness_recency_days),
            ("responsiveness_half_life_days", self.responsiveness_half_life_days),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(app_err!("{name} must be a positive number of days, got {value}"));
            }
        }

        for (name, value) in [
            ("readme_presence_credit", self.readme_presence_credit),
            ("readme_depth_credit", self.readme_depth_credit),
            ("examples_credit", self.examples_credit),
            ("archived_score_cap", self.archived_score_cap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(app_err!("{name} must be between 0 and 1, got {value}"));
            }
        }

        if self.readme_target_length == 0 {
            return Err(app_err!("readme_target_length must be greater than 0"));
        }

        for id in &self.license_allow_list {
            if spdx::license_id(id).is_none() {
                return Err(app_err!("license_allow_list contains '{id}', which is not a known SPDX license identifier"));
            }
        }

        Ok(())
    }
}
