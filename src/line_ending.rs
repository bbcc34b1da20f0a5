/// Line terminator used when writing output files.
///
/// Input lines are accepted with either terminator, the terminator is never part of the
/// record or the header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineEnding {
    /// '\n'
    #[default]
    Lf,
    /// "\r\n"
    CrLf,
}

impl LineEnding {
    /// The terminator as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Remove a trailing "\n" or "\r\n" from a line read from the input.
    pub(crate) fn strip(line: &str) -> &str {
        let line = line.strip_suffix('\n').unwrap_or(line);
        line.strip_suffix('\r').unwrap_or(line)
    }
}
