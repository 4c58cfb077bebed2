//! The parsed thread forest.

use std::collections::{BTreeSet, HashMap};

use crate::transclusion::{transcluded_from_element, transclusion_source};
use crate::{ItemId, MarkupNode, ThreadItem, TranscludedFrom};

/// All thread items of a page, in document order, linked into one tree per
/// heading.
///
/// Items refer to each other by [`ItemId`]; the arena owns them all. The
/// markup tree is borrowed by handle only, and items describe it as it was
/// when parsed: re-parse after mutating it.
#[derive(Debug, Clone)]
pub struct Threads<N> {
    root: N,
    items: Vec<ThreadItem<N>>,
    headings: Vec<ItemId>,
    by_id: HashMap<String, ItemId>,
}

impl<N: MarkupNode> Threads<N> {
    /// Assemble from already linked items.
    pub fn from_parts(
        root: N,
        items: Vec<ThreadItem<N>>,
        headings: Vec<ItemId>,
        by_id: HashMap<String, ItemId>,
    ) -> Self {
        Self {
            root,
            items,
            headings,
            by_id,
        }
    }

    /// Root node the page was parsed from.
    pub fn root(&self) -> &N {
        &self.root
    }

    /// Every item in document order, including unconnected comments.
    pub fn items(&self) -> &[ThreadItem<N>] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> &ThreadItem<N> {
        &self.items[id.0]
    }

    /// Tree roots, one per heading.
    pub fn headings(&self) -> &[ItemId] {
        &self.headings
    }

    /// Ids of all comments in document order.
    pub fn comments(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_heading())
            .map(|(i, _)| ItemId(i))
    }

    pub fn find_comment_by_id(&self, id: &str) -> Option<ItemId> {
        self.by_id.get(id).copied()
    }

    /// Follow the last reply of each item down to the end of the chain.
    pub fn deepest_last_reply(&self, id: ItemId) -> ItemId {
        let mut current = id;
        while let Some(&last) = self.item(current).replies.last() {
            current = last;
        }
        current
    }

    /// The heading whose tree contains `id`, if connected.
    pub fn heading_of(&self, id: ItemId) -> Option<ItemId> {
        let mut current = Some(id);
        while let Some(c) = current {
            if self.item(c).is_heading() {
                return Some(c);
            }
            current = self.item(c).parent;
        }
        None
    }

    /// Sorted, de-duplicated authors of every comment below `id`.
    pub fn authors_below(&self, id: ItemId) -> Vec<String> {
        let mut authors = BTreeSet::new();
        let mut stack: Vec<ItemId> = self.item(id).replies.clone();
        while let Some(reply) = stack.pop() {
            let item = self.item(reply);
            if let Some(author) = item.author() {
                authors.insert(author.to_string());
            }
            stack.extend(item.replies.iter().copied());
        }
        authors.into_iter().collect()
    }

    /// Page the item was transcluded from.
    ///
    /// Templates used inside a comment (pings, signature templates) do not
    /// count: the item is transcluded only if all of its wrappers belong to
    /// one and the same transclusion.
    pub fn transcluded_from(&self, id: ItemId) -> TranscludedFrom {
        let range = &self.item(id).range;
        let covered = range
            .fully_covered_siblings(&self.root)
            .unwrap_or_else(|| vec![range.end_container.clone()]);

        let node = transcluded_from_element(&covered[0]);
        if covered[1..]
            .iter()
            .any(|other| transcluded_from_element(other) != node)
        {
            return TranscludedFrom::NotTranscluded;
        }

        match node {
            Some(node) => transclusion_source(&node),
            None => TranscludedFrom::NotTranscluded,
        }
    }
}
