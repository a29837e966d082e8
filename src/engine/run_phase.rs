use strum::Display;

/// Progress of one rating run.
///
/// A run moves strictly forward through the phases and never retries. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Dispatching,
    Collecting,
    Aggregating,
    Done,
}

impl RunPhase {
    /// The phase following this one, or `None` once the run is done.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Dispatching),
            Self::Dispatching => Some(Self::Collecting),
            Self::Collecting => Some(Self::Aggregating),
            Self::Aggregating => Some(Self::Done),
            Self::Done => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}
