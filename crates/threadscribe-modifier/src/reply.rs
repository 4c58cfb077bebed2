//! Placing reply links and composed replies under a comment.

use std::sync::LazyLock;

use regex::Regex;
use threadscribe_core::{ItemId, MarkupNode, ModifyError, NodeType, Threads, html_trim};

use crate::list::{add_list_item, add_sibling_list_item};
use crate::signing::{
    append_signature, create_wikitext_node, is_html_signed, is_wikitext_signed,
    strip_redundant_linebreaks,
};

static TRAILING_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?-u:\s)*$").unwrap());

/// Insert `link` right after the end of `comment`.
///
/// Trailing ASCII whitespace of the comment's last text node stays after
/// the link, so that the newline preceding a following list does not
/// become visible. Non-breaking spaces are content and stay before it.
pub fn add_reply_link<N: MarkupNode>(
    threads: &Threads<N>,
    comment: ItemId,
    link: &N,
) -> Result<(), ModifyError> {
    let item = threads.item(comment);
    if item.is_heading() {
        return Err(ModifyError::NotAComment);
    }
    let target = &item.range.end_container;
    if target.node_type() == NodeType::Text {
        let data = target.data().unwrap_or_default();
        if let Some(whitespace) = TRAILING_WHITESPACE.find(&data)
            && !whitespace.is_empty()
        {
            target.split_text(data[..whitespace.start()].chars().count());
        }
    }
    let parent = target.parent().ok_or(ModifyError::Detached)?;
    parent.insert_after(link, target);
    Ok(())
}

/// Move every child of `container` into its own new list item under
/// `comment`; the first item is created with [`add_list_item`], later ones
/// next to it. Returns the new items.
pub fn add_reply<N: MarkupNode>(
    threads: &Threads<N>,
    comment: ItemId,
    container: &N,
) -> Result<Vec<N>, ModifyError> {
    let mut items: Vec<N> = Vec::new();
    while let Some(child) = container.first_child() {
        let item = match items.last() {
            None => add_list_item(threads, comment)?,
            Some(previous) => add_sibling_list_item(previous)?,
        };
        item.append_child(&child);
        items.push(item);
    }
    log::debug!("added reply to {comment:?} in {} items", items.len());
    Ok(items)
}

/// Reply to `comment` with raw wikitext, one paragraph per line, signed
/// with `signature_prefix` and four tildes unless already signed.
pub fn add_wikitext_reply<N: MarkupNode>(
    threads: &Threads<N>,
    comment: ItemId,
    wikitext: &str,
    signature_prefix: &str,
) -> Result<Vec<N>, ModifyError> {
    let document = threads.root();
    let container = document.create_element("div");
    let wikitext = strip_redundant_linebreaks(wikitext);
    for line in wikitext.split('\n') {
        let p = document.create_element("p");
        p.append_child(&create_wikitext_node(document, line));
        container.append_child(&p);
    }
    if !is_wikitext_signed(&wikitext) {
        append_signature(&container, signature_prefix);
    }
    add_reply(threads, comment, &container)
}

/// Reply to `comment` with already-built markup held in `container`.
/// Empty paragraphs are dropped, and a signature is added unless the
/// content already ends with one.
pub fn add_html_reply<N: MarkupNode>(
    threads: &Threads<N>,
    comment: ItemId,
    container: &N,
    signature_prefix: &str,
) -> Result<Vec<N>, ModifyError> {
    for child in container.children() {
        if child.has_tag(&["p"]) && is_empty_paragraph(&child) {
            container.remove_child(&child);
        }
    }
    if !is_html_signed(container) {
        append_signature(container, signature_prefix);
    }
    add_reply(threads, comment, container)
}

fn is_empty_paragraph<N: MarkupNode>(p: &N) -> bool {
    p.children().iter().all(|child| {
        child.node_type() == NodeType::Text
            && html_trim(&child.data().unwrap_or_default()).is_empty()
    })
}
