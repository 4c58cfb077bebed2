//! Thread items: headings and signed comments.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{ItemWarning, MarkupNode, Range, TimestampWarning};

/// Handle of an item inside a [`Threads`](crate::Threads) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

/// A parsed signature timestamp, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub instant: DateTime<Utc>,
    pub warning: Option<TimestampWarning>,
}

impl Timestamp {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            warning: None,
        }
    }

    /// ISO 8601 form with millisecond precision, e.g. `2021-06-03T14:32:00.000Z`.
    pub fn to_iso(&self) -> String {
        self.instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Fields specific to comments.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment<N> {
    pub author: String,
    pub timestamp: Timestamp,
    /// One range per signature merged into this comment.
    pub signature_ranges: Vec<Range<N>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind<N> {
    Heading {
        /// Synthetic heading standing in for the section before the first
        /// real heading.
        placeholder: bool,
    },
    Comment(Comment<N>),
}

/// A heading or comment found on a discussion page.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadItem<N> {
    pub kind: ItemKind<N>,
    /// List nesting depth. Headings are 0, comments at least 1.
    pub level: usize,
    pub range: Range<N>,
    /// Unique within the page; assigned to comments by the tree builder.
    pub id: Option<String>,
    pub replies: Vec<ItemId>,
    pub parent: Option<ItemId>,
    pub warnings: Vec<ItemWarning>,
}

impl<N: MarkupNode> ThreadItem<N> {
    pub fn heading(range: Range<N>) -> Self {
        Self::new(ItemKind::Heading { placeholder: false }, 0, range)
    }

    /// Placeholder heading for comments that precede every real heading.
    pub fn placeholder(root: &N) -> Self {
        Self::new(ItemKind::Heading { placeholder: true }, 0, Range::collapsed(root))
    }

    pub fn comment(
        level: usize,
        range: Range<N>,
        signature_range: Range<N>,
        timestamp: Timestamp,
        author: impl Into<String>,
    ) -> Self {
        Self::new(
            ItemKind::Comment(Comment {
                author: author.into(),
                timestamp,
                signature_ranges: vec![signature_range],
            }),
            level,
            range,
        )
    }

    fn new(kind: ItemKind<N>, level: usize, range: Range<N>) -> Self {
        Self {
            kind,
            level,
            range,
            id: None,
            replies: Vec::new(),
            parent: None,
            warnings: Vec::new(),
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.kind, ItemKind::Heading { .. })
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, ItemKind::Heading { placeholder: true })
    }

    pub fn as_comment(&self) -> Option<&Comment<N>> {
        match &self.kind {
            ItemKind::Comment(comment) => Some(comment),
            ItemKind::Heading { .. } => None,
        }
    }

    pub fn as_comment_mut(&mut self) -> Option<&mut Comment<N>> {
        match &mut self.kind {
            ItemKind::Comment(comment) => Some(comment),
            ItemKind::Heading { .. } => None,
        }
    }

    pub fn author(&self) -> Option<&str> {
        self.as_comment().map(|c| c.author.as_str())
    }

    pub fn warn(&mut self, warning: impl Into<ItemWarning>) {
        self.warnings.push(warning.into());
    }
}
