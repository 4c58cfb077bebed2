//! Detection of content rendered from another page.
//!
//! Parsoid marks the first node generated by a template with
//! `typeof="mw:Transclusion"` and ties every node of the same output
//! together with a shared `about="#mwtN"` attribute.

use serde_json::Value;

use crate::node::MarkupNode;

/// Where a thread item's markup comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscludedFrom {
    /// Written directly on the page.
    NotTranscluded,
    /// Transcluded, but not from a single identifiable page.
    Unknown,
    /// Transcluded from this page (title in text form).
    Page(String),
}

fn has_transclusion_type<N: MarkupNode>(node: &N) -> bool {
    node.attribute("typeof")
        .is_some_and(|t| t.split_whitespace().any(|t| t == "mw:Transclusion"))
}

fn is_template_about(about: &str) -> bool {
    about
        .strip_prefix("#mwt")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// The transclusion node that generated `node`, if any.
///
/// Walks up from `node`; for each element in a template's `about` group,
/// steps back to the first node of the group and returns it if it carries
/// the transclusion marker.
pub fn transcluded_from_element<N: MarkupNode>(node: &N) -> Option<N> {
    let mut current = Some(node.clone());
    while let Some(mut n) = current {
        if n.is_element() {
            if has_transclusion_type(&n) {
                return Some(n);
            }
            if let Some(about) = n.attribute("about").filter(|a| is_template_about(a)) {
                while let Some(prev) = n.previous_sibling() {
                    if prev.is_element() && prev.attribute("about").as_deref() == Some(about.as_str())
                    {
                        n = prev;
                    } else {
                        break;
                    }
                }
                if has_transclusion_type(&n) {
                    return Some(n);
                }
            }
        }
        current = n.parent();
    }
    None
}

/// Resolve the page a transclusion node was rendered from.
///
/// Only a simple single-template transclusion names a page; parser
/// functions and multi-part transclusions are [`TranscludedFrom::Unknown`].
pub fn transclusion_source<N: MarkupNode>(node: &N) -> TranscludedFrom {
    let data: Option<Value> = node
        .attribute("data-mw")
        .and_then(|raw| serde_json::from_str(&raw).ok());
    let href = data.as_ref().and_then(|data| {
        let parts = data.get("parts")?.as_array()?;
        if parts.len() != 1 {
            return None;
        }
        parts[0]
            .get("template")?
            .get("target")?
            .get("href")?
            .as_str()
    });
    match href {
        Some(href) => TranscludedFrom::Page(normalize_resource_name(href)),
        None => TranscludedFrom::Unknown,
    }
}

/// `./Talk:Foo_bar%3F` -> `Talk:Foo bar?`
fn normalize_resource_name(href: &str) -> String {
    let name = href.strip_prefix("./").unwrap_or(href);
    let decoded = urlencoding::decode(name).map_or_else(|_| name.to_string(), |d| d.into_owned());
    decoded.replace('_', " ")
}
