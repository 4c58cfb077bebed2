//! Composing reply bodies: line breaks, signatures, raw wikitext nodes.

use std::sync::LazyLock;

use regex::Regex;
use threadscribe_core::{MarkupNode, NodeType, html_trim};

static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());
static SIGNED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^~]|^)~~~~$").unwrap());
static TILDES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~{3,5}$").unwrap());

const SIGNATURE: &str = "~~~~";

/// Trim, turn `\r` into `\n` and collapse runs of newlines.
pub fn strip_redundant_linebreaks(wikitext: &str) -> String {
    let text = html_trim(wikitext).replace('\r', "\n");
    NEWLINES.replace_all(&text, "\n").into_owned()
}

/// True if the wikitext ends in exactly four tildes.
pub fn is_wikitext_signed(wikitext: &str) -> bool {
    SIGNED.is_match(html_trim(wikitext))
}

/// Make sure the wikitext ends with a four-tilde signature. Three or five
/// trailing tildes are corrected to four; otherwise `prefix` and a
/// signature are appended.
pub fn auto_sign_wikitext(wikitext: &str, prefix: &str) -> String {
    let wikitext = wikitext.trim();
    match TILDES.find(wikitext) {
        Some(tildes) if tildes.len() == SIGNATURE.len() => wikitext.to_string(),
        Some(tildes) => format!("{}{SIGNATURE}", &wikitext[..tildes.start()]),
        None => format!("{wikitext}{prefix}{SIGNATURE}"),
    }
}

/// A Parsoid transclusion span that serializes back to `wikitext`.
pub fn create_wikitext_node<N: MarkupNode>(document: &N, wikitext: &str) -> N {
    let span = document.create_element("span");
    span.set_attribute("typeof", "mw:Transclusion");
    span.set_attribute(
        "data-mw",
        &serde_json::json!({ "parts": [wikitext] }).to_string(),
    );
    span
}

/// True if `container` ends with a wikitext node holding a signature,
/// ignoring trailing whitespace at every level.
pub fn is_html_signed<N: MarkupNode>(container: &N) -> bool {
    let Some(signature) = last_signature_node(container) else {
        return false;
    };
    let mut node = signature;
    while node != *container {
        let mut next = node.next_sibling();
        while let Some(sibling) = next.as_ref().filter(|s| is_blank_text(*s)) {
            next = sibling.next_sibling();
        }
        if next.is_some() {
            return false;
        }
        match node.parent() {
            Some(parent) => node = parent,
            None => break,
        }
    }
    true
}

fn is_blank_text<N: MarkupNode>(node: &N) -> bool {
    node.node_type() == NodeType::Text && html_trim(&node.data().unwrap_or_default()).is_empty()
}

fn last_signature_node<N: MarkupNode>(node: &N) -> Option<N> {
    let mut found = None;
    for child in node.children() {
        if child.has_tag(&["span"])
            && child.attribute("typeof").as_deref() == Some("mw:Transclusion")
            && child
                .attribute("data-mw")
                .is_some_and(|data| data.contains(SIGNATURE))
        {
            found = Some(child.clone());
        }
        if let Some(inner) = last_signature_node(&child) {
            found = Some(inner);
        }
    }
    found
}

/// Sign the last paragraph of `container`, adding one if the content does
/// not end in a paragraph.
pub fn append_signature<N: MarkupNode>(container: &N, prefix: &str) {
    let last = match container.last_child() {
        Some(last) if last.has_tag(&["p"]) => last,
        _ => {
            let p = container.create_element("p");
            container.append_child(&p);
            p
        }
    };
    last.append_child(&create_wikitext_node(container, &format!("{prefix}{SIGNATURE}")));
}
