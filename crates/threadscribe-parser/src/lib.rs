//! Discussion thread parser for threadscribe.
//!
//! Finds signed comments in a rendered discussion page and links them into
//! reply trees:
//!
//! - [`TimestampMatcher`] compiles the wiki's date format into a regex and
//!   parses matches back into UTC instants.
//! - [`find_signature`] recovers the author from links preceding a
//!   timestamp.
//! - [`build_items`] produces the flat, document-ordered item list.
//! - [`build_threads`] assigns ids and reply links.
//!
//! [`ThreadParser`] bundles all of it behind one configuration.

mod items;
mod signature;
mod threads;
mod timestamp;
mod titles;

pub use items::build_items;
pub use signature::{Signature, find_signature};
pub use threads::build_threads;
pub use timestamp::{
    Directive, TimestampMatch, TimestampMatcher, TimestampParser, compile_pattern, digit_pattern,
    stitched_position, stitched_text,
};
pub use titles::SiteTitles;

use threadscribe_core::{LocaleConfig, MarkupNode, ParseError, ThreadItem, Threads, TitleResolver};

/// Parser for the discussion pages of one wiki.
#[derive(Debug, Clone)]
pub struct ThreadParser<R = SiteTitles> {
    config: LocaleConfig,
    matcher: TimestampMatcher,
    resolver: R,
}

impl ThreadParser<SiteTitles> {
    /// Parser using [`SiteTitles`] for link resolution.
    pub fn new(config: LocaleConfig) -> Result<Self, ParseError> {
        let resolver = SiteTitles::new(&config)?;
        Self::with_resolver(config, resolver)
    }
}

impl<R: TitleResolver> ThreadParser<R> {
    pub fn with_resolver(config: LocaleConfig, resolver: R) -> Result<Self, ParseError> {
        let matcher = TimestampMatcher::new(&config)?;
        Ok(Self {
            config,
            matcher,
            resolver,
        })
    }

    pub fn config(&self) -> &LocaleConfig {
        &self.config
    }

    pub fn matcher(&self) -> &TimestampMatcher {
        &self.matcher
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Headings and comments under `root`, in document order.
    pub fn parse_flat_items<N: MarkupNode>(&self, root: &N) -> Result<Vec<ThreadItem<N>>, ParseError> {
        build_items(root, &self.matcher, &self.resolver, &self.config)
    }

    /// Parse `root` into threads rooted at headings.
    pub fn parse_threads<N: MarkupNode>(&self, root: &N) -> Result<Threads<N>, ParseError> {
        let items = self.parse_flat_items(root)?;
        log::debug!("parsed {} thread items", items.len());
        Ok(build_threads(root.clone(), items))
    }
}
