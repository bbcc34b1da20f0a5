use std::fmt::{Display, Formatter};

/// Stages of a split run.
///
/// A run moves forward through the stages in declaration order. A failure in any stage
/// moves it to [Phase::Closing] and then to [Phase::Failed].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    ReadingHeader,
    Reading,
    Sorting,
    Writing,
    Closing,
    Completed,
    Failed,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::ReadingHeader => "reading header",
            Phase::Reading => "reading",
            Phase::Sorting => "sorting",
            Phase::Writing => "writing",
            Phase::Closing => "closing",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
