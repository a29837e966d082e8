use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// The quality dimensions a package is scored on.
///
/// The declaration order is the canonical order used for dispatch, aggregation, and reports.
/// The display form of each kind is its name on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, EnumCount, Display, IntoStaticStr, Serialize, Deserialize,
)]
pub enum MetricKind {
    RampUp,
    Correctness,
    BusFactor,
    ResponsiveMaintainer,
    LicenseScore,
    GoodPinningPractice,
    PullRequest,
}

impl MetricKind {
    /// Name of the wire field carrying this metric's score.
    #[must_use]
    pub fn field(self) -> &'static str {
        self.into()
    }

    /// Name of the wire field carrying this metric's latency.
    #[must_use]
    pub const fn latency_field(self) -> &'static str {
        match self {
            Self::RampUp => "RampUpLatency",
            Self::Correctness => "CorrectnessLatency",
            Self::BusFactor => "BusFactorLatency",
            Self::ResponsiveMaintainer => "ResponsiveMaintainerLatency",
            Self::LicenseScore => "LicenseScoreLatency",
            Self::GoodPinningPractice => "GoodPinningPracticeLatency",
            Self::PullRequest => "PullRequestLatency",
        }
    }
}
