//! Non-fatal diagnostics attached to thread items.

use std::fmt;

/// Problem found while parsing a timestamp. The timestamp is still usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampWarning {
    /// The local time occurs twice at a DST switchover; the later
    /// occurrence was chosen because its abbreviation matched.
    AmbiguousDst,
    /// The abbreviation matches neither possible offset for this local time.
    WrongAbbreviation,
}

/// A diagnostic attached to a [`ThreadItem`](crate::ThreadItem).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemWarning {
    /// The start and end of the comment sit at different list depths.
    DifferentIndentation,
    /// The comment is nested more than one level below its predecessor.
    SkipsIndentation,
    /// No earlier item exists at the level this comment replies to.
    Unconnected,
    /// The timestamp parsed with a warning.
    Timestamp(TimestampWarning),
}

impl fmt::Display for TimestampWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampWarning::AmbiguousDst => {
                f.write_str("Ambiguous time at DST switchover was parsed")
            }
            TimestampWarning::WrongAbbreviation => {
                f.write_str("Timestamp has timezone abbreviation for the wrong time")
            }
        }
    }
}

impl fmt::Display for ItemWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemWarning::DifferentIndentation => {
                f.write_str("Comment starts and ends with different indentation")
            }
            ItemWarning::SkipsIndentation => f.write_str("Comment skips indentation level"),
            ItemWarning::Unconnected => f.write_str("Comment could not be connected to a thread"),
            ItemWarning::Timestamp(warning) => warning.fmt(f),
        }
    }
}

impl From<TimestampWarning> for ItemWarning {
    fn from(warning: TimestampWarning) -> Self {
        ItemWarning::Timestamp(warning)
    }
}
