//! Document-order traversal helpers.

use crate::node::{MarkupNode, NodeType, html_trim};

/// The node following `node` in document order within `root`.
///
/// When `descend` is false the children of `node` are skipped.
pub fn next_in_order<N: MarkupNode>(node: &N, root: &N, descend: bool) -> Option<N> {
    if descend && let Some(child) = node.first_child() {
        return Some(child);
    }
    let mut current = node.clone();
    loop {
        if &current == root {
            return None;
        }
        if let Some(next) = current.next_sibling() {
            return Some(next);
        }
        current = current.parent()?;
    }
}

/// True for non-blank text or CDATA, and for childless elements.
pub fn is_interesting_leaf<N: MarkupNode>(node: &N) -> bool {
    match node.node_type() {
        NodeType::Text | NodeType::CData => {
            !html_trim(&node.data().unwrap_or_default()).is_empty()
        }
        NodeType::Element => node.first_child().is_none(),
        _ => false,
    }
}

/// First interesting leaf after `node` in document order, ignoring the
/// descendants of `node` (unless `node` is the root itself).
pub fn next_interesting_leaf<N: MarkupNode>(node: &N, root: &N) -> Option<N> {
    let mut current = next_in_order(node, root, node == root);
    while let Some(n) = current {
        if is_interesting_leaf(&n) {
            return Some(n);
        }
        current = next_in_order(&n, root, true);
    }
    None
}
