//! Errors and the title-resolution seam.

/// Error while parsing a discussion page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A numeric directive captured something that isn't a number.
    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),
    /// The captured fields name a date or time that doesn't exist, such
    /// as 31 February. Page parsing drops that one signature.
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid locale configuration: {0}")]
    InvalidConfig(String),
}

/// Error while restructuring the markup tree.
#[derive(Debug, thiserror::Error)]
pub enum ModifyError {
    /// The tree violated an assumption of the insertion algorithm. Never
    /// expected for well-formed input.
    #[error("no insertion point found for reply")]
    NoInsertionPoint,
    #[error("thread item is not a comment")]
    NotAComment,
    #[error("node is not attached to a parent")]
    Detached,
}

/// A page title split into namespace and main text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub namespace: i32,
    /// Title without the namespace prefix, in text form (spaces, not
    /// underscores).
    pub main_text: String,
}

/// Turns link targets into page titles.
pub trait TitleResolver {
    /// Title a link points to, or `None` if it doesn't point to a page.
    fn title_from_href(&self, href: &str) -> Option<Title>;

    /// Normalize `text` as a title in the given namespace.
    fn make_title(&self, namespace: i32, text: &str) -> Option<Title>;
}
