//! Threadscribe - discussion threads on wiki talk pages
//!
//! Threadscribe reads the rendered HTML of a talk page and recovers its
//! conversation structure:
//! - Signed comments found by localized timestamps and user links
//! - Headings and a reply tree per heading
//! - Stable comment ids (`author|timestamp|n`)
//! - Soft warnings for markup that doesn't follow talk page conventions
//!
//! It can then restructure the same tree to add a reply at the right
//! indentation, after all existing replies.
//!
//! # Quick Start
//!
//! ```rust
//! use threadscribe::prelude::*;
//!
//! let body = threadscribe::html::parse_body(
//!     r#"<h2>Topic</h2><p>Hello. <a href="./User:Alice">Alice</a> 10:00, 1 May 2021 (UTC)</p>"#,
//! );
//! let parser = ThreadParser::new(LocaleConfig::default()).unwrap();
//! let threads = parser.parse_threads(&body).unwrap();
//!
//! let id = threads
//!     .find_comment_by_id("Alice|2021-05-01T10:00:00.000Z|0")
//!     .unwrap();
//! threadscribe::modifier::add_wikitext_reply(&threads, id, "Hi Alice", " ").unwrap();
//!
//! assert!(threadscribe::html::serialize_inner(&body).contains("<dl><dd"));
//! ```
//!
//! # Features
//!
//! - `html` - html5ever-backed markup tree (default)
//!
//! # Architecture
//!
//! The algorithms work on any tree implementing [`MarkupNode`]:
//! - `threadscribe-core`: node trait, ranges, thread items, configuration
//! - `threadscribe-parser`: timestamps, signatures, the thread tree
//! - `threadscribe-modifier`: list surgery and reply composition
//! - `threadscribe-html`: the [`MarkupNode`] implementation over html5ever
//!
//! A parsed [`Threads`] borrows nothing but holds handles into the tree;
//! after any modification, parse again before relying on its ranges.

// Re-export core types
pub use threadscribe_core::*;

/// Comment detection and thread building.
pub mod parser {
    pub use threadscribe_parser::*;
}

/// Reply insertion.
pub mod modifier {
    pub use threadscribe_modifier::*;
}

/// HTML parsing and serialization.
#[cfg(feature = "html")]
pub mod html {
    pub use threadscribe_html::*;
}

/// Common imports.
pub mod prelude {
    pub use crate::parser::{SiteTitles, ThreadParser};
    pub use crate::{
        ItemId, ItemKind, ItemWarning, LocaleConfig, MarkupNode, ModifyError, ParseError,
        ThreadItem, Threads,
    };

    #[cfg(feature = "html")]
    pub use crate::html::RcNode;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "html")]
    fn test_parse_and_reply() {
        let body = html::parse_body(
            r#"<h2>T</h2><p>A <a href="./User:A">A</a> 10:00, 1 May 2021 (UTC)</p>"#,
        );
        let parser = parser::ThreadParser::new(LocaleConfig::default()).unwrap();
        let threads = parser.parse_threads(&body).unwrap();
        assert_eq!(threads.headings().len(), 1);

        let id = threads.comments().next().unwrap();
        let items = modifier::add_wikitext_reply(&threads, id, "Reply", " ").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(indent_level(&items[0], &body), 1);
    }
}
