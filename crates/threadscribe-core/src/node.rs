//! Markup tree abstraction.
//!
//! The discussion parser and the reply-insertion engine never own the tree
//! they work on. They see it through [`MarkupNode`], a cheap-to-clone handle
//! with the small capability set both sides need: type and tag inspection,
//! sibling/child navigation, and a handful of DOM-style mutations.

use std::fmt::Debug;

/// Kind of a node in a markup tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// The document root.
    Document,
    /// An element such as `<p>` or `<a>`.
    Element,
    /// A text node.
    Text,
    /// A CDATA section.
    CData,
    /// A markup comment (`<!-- -->`).
    Comment,
    /// Doctype, processing instruction, or anything else.
    Other,
}

/// A handle into an externally owned, mutable markup tree.
///
/// Equality is node identity, not structural equality: two handles are
/// equal when they refer to the same node.
pub trait MarkupNode: Clone + PartialEq + Debug {
    /// Kind of this node.
    fn node_type(&self) -> NodeType;

    /// Lowercase tag name, for elements only.
    fn tag_name(&self) -> Option<&str>;

    /// Attribute value, for elements only.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set (or replace) an attribute. No-op for non-elements.
    fn set_attribute(&self, name: &str, value: &str);

    /// Character data of text, CDATA and comment nodes.
    fn data(&self) -> Option<String>;

    /// Replace the character data of a text node.
    fn set_data(&self, data: &str);

    /// Parent node, if attached.
    fn parent(&self) -> Option<Self>;

    /// Child nodes in document order.
    fn children(&self) -> Vec<Self>;

    /// Create a detached element owned by the same document.
    fn create_element(&self, tag: &str) -> Self;

    /// Create a detached text node owned by the same document.
    fn create_text(&self, text: &str) -> Self;

    /// Detached copy of this node without its children.
    fn clone_shallow(&self) -> Self;

    /// Insert `child` before `reference`, or append when `reference` is
    /// `None`. The child is detached from its current parent first.
    fn insert_before(&self, child: &Self, reference: Option<&Self>);

    /// Remove `child` from this node's children.
    fn remove_child(&self, child: &Self);

    fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// True if this is an element whose tag is one of `tags`.
    fn has_tag(&self, tags: &[&str]) -> bool {
        self.tag_name().is_some_and(|tag| tags.contains(&tag))
    }

    fn child_count(&self) -> usize {
        self.children().len()
    }

    fn first_child(&self) -> Option<Self> {
        self.children().into_iter().next()
    }

    fn last_child(&self) -> Option<Self> {
        self.children().pop()
    }

    /// Position of this node among its parent's children (0 when detached).
    fn child_index(&self) -> usize {
        self.parent()
            .and_then(|parent| parent.children().iter().position(|c| c == self))
            .unwrap_or(0)
    }

    fn next_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let siblings = parent.children();
        let index = siblings.iter().position(|c| c == self)?;
        siblings.get(index + 1).cloned()
    }

    fn previous_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let siblings = parent.children();
        let index = siblings.iter().position(|c| c == self)?;
        index.checked_sub(1).and_then(|i| siblings.get(i).cloned())
    }

    fn append_child(&self, child: &Self) {
        self.insert_before(child, None);
    }

    /// Insert `child` directly after `reference`.
    fn insert_after(&self, child: &Self, reference: &Self) {
        let next = reference.next_sibling();
        self.insert_before(child, next.as_ref());
    }

    /// Remove this node from its parent, if it has one.
    fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    /// DOM `textContent`: own data for character nodes, concatenated
    /// descendant text for elements and documents.
    fn text_content(&self) -> String {
        match self.node_type() {
            NodeType::Text | NodeType::CData | NodeType::Comment => self.data().unwrap_or_default(),
            NodeType::Other => String::new(),
            NodeType::Document | NodeType::Element => {
                let mut text = String::new();
                for child in self.children() {
                    if child.node_type() != NodeType::Comment {
                        text.push_str(&child.text_content());
                    }
                }
                text
            }
        }
    }

    /// True if `other` is this node or one of its descendants.
    fn contains(&self, other: &Self) -> bool {
        let mut node = Some(other.clone());
        while let Some(n) = node {
            if &n == self {
                return true;
            }
            node = n.parent();
        }
        false
    }

    /// Split a text node at a character offset; the tail becomes a new
    /// sibling text node which is returned.
    fn split_text(&self, offset: usize) -> Self {
        let data = self.data().unwrap_or_default();
        let split = data
            .char_indices()
            .nth(offset)
            .map_or(data.len(), |(i, _)| i);
        let tail = self.create_text(&data[split..]);
        self.set_data(&data[..split]);
        if let Some(parent) = self.parent() {
            parent.insert_after(&tail, self);
        }
        tail
    }
}

/// Trim the characters HTML treats as whitespace (not NBSP).
pub fn html_trim(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' '))
}

/// Nearest node, starting at `node` itself, that is an element with one of
/// the given tags.
pub fn closest_element<N: MarkupNode>(node: &N, tags: &[&str]) -> Option<N> {
    let mut current = Some(node.clone());
    while let Some(n) = current {
        if n.has_tag(tags) {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// Number of list items (`li`/`dd`) wrapping `node`, counting the node
/// itself and stopping at `root`.
pub fn indent_level<N: MarkupNode>(node: &N, root: &N) -> usize {
    let mut level = 0;
    let mut current = Some(node.clone());
    while let Some(n) = current {
        if &n == root {
            break;
        }
        if n.has_tag(&["li", "dd"]) {
            level += 1;
        }
        current = n.parent();
    }
    level
}

/// Check if an element is rendered as a block.
pub fn is_block_element<N: MarkupNode>(node: &N) -> bool {
    node.tag_name().is_some_and(is_block_tag)
}

/// Check if a tag name is a block-level element.
pub fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "caption"
            | "center"
            | "dd"
            | "details"
            | "dialog"
            | "dir"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hgroup"
            | "hr"
            | "li"
            | "main"
            | "menu"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
            | "ul"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{el, text};

    #[test]
    fn test_siblings_and_index() {
        let a = text("a");
        let b = el("b", vec![]);
        let c = text("c");
        let p = el("p", vec![a.clone(), b.clone(), c.clone()]);
        assert_eq!(b.child_index(), 1);
        assert_eq!(b.previous_sibling(), Some(a.clone()));
        assert_eq!(b.next_sibling(), Some(c.clone()));
        assert_eq!(a.previous_sibling(), None);
        assert_eq!(c.next_sibling(), None);
        assert!(p.contains(&c));
        assert!(!b.contains(&c));
    }

    #[test]
    fn test_split_text() {
        let t = text("hello world  ");
        let p = el("p", vec![t.clone()]);
        let tail = t.split_text(11);
        assert_eq!(t.data().unwrap(), "hello world");
        assert_eq!(tail.data().unwrap(), "  ");
        assert_eq!(p.child_count(), 2);
    }

    #[test]
    fn test_insert_moves_between_parents() {
        let x = text("x");
        let p = el("p", vec![x.clone()]);
        let div = el("div", vec![]);
        div.append_child(&x);
        assert_eq!(p.child_count(), 0);
        assert_eq!(x.parent(), Some(div));
    }

    #[test]
    fn test_indent_level_and_closest() {
        let t = text("deep");
        let root = el(
            "body",
            vec![el("dl", vec![el("dd", vec![el("ul", vec![el("li", vec![t.clone()])])])])],
        );
        assert_eq!(indent_level(&t, &root), 2);
        let li = closest_element(&t, &["li", "dd", "p"]).unwrap();
        assert_eq!(li.tag_name(), Some("li"));
        assert_eq!(indent_level(&li, &li), 0);
    }

    #[test]
    fn test_text_content_skips_comments() {
        let p = el(
            "p",
            vec![text("a"), crate::fixture::comment("hidden"), el("b", vec![text("c")])],
        );
        assert_eq!(p.text_content(), "ac");
    }

    #[test]
    fn test_html_trim_keeps_nbsp() {
        assert_eq!(html_trim("\n\t x \r\n"), "x");
        assert_eq!(html_trim("\u{a0}x"), "\u{a0}x");
    }
}
