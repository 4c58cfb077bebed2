//! Non-owning ranges over a markup tree.

use crate::node::{MarkupNode, NodeType, html_trim};

/// A span of the markup tree, DOM `Range` style.
///
/// Offsets are child indices for element/document containers and
/// character offsets for text containers. A range does not keep its
/// containers alive or up to date: it is only meaningful until the tree is
/// next mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Range<N> {
    pub start_container: N,
    pub start_offset: usize,
    pub end_container: N,
    pub end_offset: usize,
}

impl<N: MarkupNode> Range<N> {
    pub fn new(start_container: N, start_offset: usize, end_container: N, end_offset: usize) -> Self {
        Self {
            start_container,
            start_offset,
            end_container,
            end_offset,
        }
    }

    /// Range spanning all children of `node`.
    pub fn around_contents(node: &N) -> Self {
        Self::new(node.clone(), 0, node.clone(), node.child_count())
    }

    /// Empty range at the start of `node`.
    pub fn collapsed(node: &N) -> Self {
        Self::new(node.clone(), 0, node.clone(), 0)
    }

    /// Deepest node containing both ends of the range.
    pub fn common_ancestor(&self) -> Option<N> {
        let mut node = Some(self.start_container.clone());
        while let Some(n) = node {
            if n.contains(&self.end_container) {
                return Some(n);
            }
            node = n.parent();
        }
        None
    }

    /// Children of the common ancestor that the range touches, in order.
    ///
    /// When the common ancestor is a character node it is returned alone.
    pub fn covered_siblings(&self) -> Vec<N> {
        let Some(ancestor) = self.common_ancestor() else {
            return Vec::new();
        };
        let siblings = ancestor.children();
        if siblings.is_empty() {
            return vec![ancestor];
        }

        let start = if self.start_container == ancestor {
            self.start_offset.min(siblings.len() - 1)
        } else {
            siblings
                .iter()
                .position(|s| s.contains(&self.start_container))
                .unwrap_or(0)
        };
        let end = if self.end_container == ancestor {
            self.end_offset.saturating_sub(1).min(siblings.len() - 1)
        } else {
            siblings
                .iter()
                .rposition(|s| s.contains(&self.end_container))
                .unwrap_or(siblings.len() - 1)
        };
        if end < start {
            return Vec::new();
        }
        siblings[start..=end].to_vec()
    }

    /// The sibling nodes that contain exactly this range and nothing else
    /// (ignoring blank text), widened to the outermost wrapper that holds
    /// only them. Never widens past `root`.
    pub fn fully_covered_siblings(&self, root: &N) -> Option<Vec<N>> {
        let mut siblings = self.covered_siblings();
        let first = siblings.first()?.clone();
        let last = siblings.last()?.clone();

        if !self.starts_at(&first) || !self.ends_at(&last) {
            return None;
        }

        loop {
            let Some(parent) = siblings[0].parent() else {
                break;
            };
            if &parent == root {
                break;
            }
            let only_covered = parent
                .children()
                .iter()
                .all(|child| siblings.contains(child) || is_blank_text(child));
            if !only_covered {
                break;
            }
            siblings = vec![parent];
        }

        Some(siblings)
    }

    fn starts_at(&self, first: &N) -> bool {
        if first.parent().as_ref() == Some(&self.start_container)
            && self.start_offset == first.child_index()
        {
            return true;
        }
        let mut node = Some(first.clone());
        while let Some(n) = node {
            if n == self.start_container {
                return match n.node_type() {
                    NodeType::Text | NodeType::CData => {
                        let data = n.data().unwrap_or_default();
                        let head: String = data.chars().take(self.start_offset).collect();
                        html_trim(&head).is_empty()
                    }
                    _ => n.children()[..self.start_offset.min(n.child_count())]
                        .iter()
                        .all(is_blank_text),
                };
            }
            node = n.first_child();
        }
        false
    }

    fn ends_at(&self, last: &N) -> bool {
        if last.parent().as_ref() == Some(&self.end_container)
            && self.end_offset == last.child_index() + 1
        {
            return true;
        }
        let mut node = Some(last.clone());
        while let Some(n) = node {
            if n == self.end_container {
                return match n.node_type() {
                    NodeType::Text | NodeType::CData => {
                        let data = n.data().unwrap_or_default();
                        let trimmed = data
                            .trim_end_matches(|c| matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' '));
                        self.end_offset >= trimmed.chars().count()
                    }
                    _ => {
                        let children = n.children();
                        children[self.end_offset.min(children.len())..]
                            .iter()
                            .all(is_blank_text)
                    }
                };
            }
            let mut child = n.last_child();
            while child.as_ref().is_some_and(is_blank_text) {
                child = child.and_then(|c| c.previous_sibling());
            }
            node = child;
        }
        false
    }
}

fn is_blank_text<N: MarkupNode>(node: &N) -> bool {
    node.node_type() == NodeType::Text && html_trim(&node.data().unwrap_or_default()).is_empty()
}
