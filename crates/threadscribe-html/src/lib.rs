//! HTML backend for threadscribe.
//!
//! Parses HTML5 with html5ever into a `markup5ever_rcdom` tree and exposes
//! it through [`RcNode`], which implements
//! [`MarkupNode`](threadscribe_core::MarkupNode). Changes made through the
//! handle are visible in the serialized output.

mod dom;

pub use dom::RcNode;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{RcDom, SerializableHandle};
use threadscribe_core::MarkupNode;

/// Parse an HTML document and return its document node.
pub fn parse_html(input: &str) -> RcNode {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(input);
    RcNode(dom.document)
}

/// Parse an HTML document and return its `<body>` element.
///
/// The HTML5 tree builder always synthesizes a body, so this only falls
/// back to the document node for pathological framesets.
pub fn parse_body(input: &str) -> RcNode {
    let document = parse_html(input);
    find_element(&document, "body").unwrap_or(document)
}

/// First element with the given tag, depth first, including `node`.
pub fn find_element(node: &RcNode, tag: &str) -> Option<RcNode> {
    if node.tag_name() == Some(tag) {
        return Some(node.clone());
    }
    node.children()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// First element carrying `id="..."`, depth first, including `node`.
pub fn find_by_id(node: &RcNode, id: &str) -> Option<RcNode> {
    if node.attribute("id").as_deref() == Some(id) {
        return Some(node.clone());
    }
    node.children()
        .iter()
        .find_map(|child| find_by_id(child, id))
}

/// Serialize the children of `node` as HTML.
pub fn serialize_inner(node: &RcNode) -> String {
    serialize_scope(node, TraversalScope::ChildrenOnly(None))
}

/// Serialize `node` itself as HTML. Document nodes serialize their children.
pub fn serialize_outer(node: &RcNode) -> String {
    if node.node_type() == threadscribe_core::NodeType::Document {
        return serialize_inner(node);
    }
    serialize_scope(node, TraversalScope::IncludeNode)
}

fn serialize_scope(node: &RcNode, traversal_scope: TraversalScope) -> String {
    let mut out = Vec::new();
    let handle: SerializableHandle = node.0.clone().into();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    // Writing into a Vec cannot fail.
    if serialize(&mut out, &handle, opts).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_body() {
        let body = parse_body("<p>Hello <b>world</b></p>");
        assert_eq!(body.tag_name(), Some("body"));
        assert_eq!(body.text_content(), "Hello world");
        assert_eq!(serialize_inner(&body), "<p>Hello <b>world</b></p>");
    }

    #[test]
    fn test_find_by_id() {
        let body = parse_body(r#"<div id="toc"><p>x</p></div><p id="c">y</p>"#);
        let p = find_by_id(&body, "c").unwrap();
        assert_eq!(p.text_content(), "y");
        assert!(find_by_id(&body, "missing").is_none());
    }

    #[test]
    fn test_serialize_outer() {
        let body = parse_body(r#"<p class="a">x</p>"#);
        let p = body.first_child().unwrap();
        assert_eq!(serialize_outer(&p), r#"<p class="a">x</p>"#);
    }
}
