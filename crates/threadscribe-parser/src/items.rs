//! Flat list of headings and comments in document order.

use threadscribe_core::{
    ItemWarning, LocaleConfig, MarkupNode, NodeType, ParseError, Range, ThreadItem,
    TitleResolver, closest_element, indent_level, next_in_order, next_interesting_leaf,
};

use crate::signature::find_signature;
use crate::timestamp::{TimestampMatcher, stitched_position};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const LINE_BLOCKS: &[&str] = &["li", "dd", "p"];

/// Walk `root` and collect headings and signed comments.
///
/// Comments before the first heading are preceded by a placeholder
/// heading.
pub fn build_items<N, R>(
    root: &N,
    matcher: &TimestampMatcher,
    resolver: &R,
    config: &LocaleConfig,
) -> Result<Vec<ThreadItem<N>>, ParseError>
where
    N: MarkupNode,
    R: TitleResolver + ?Sized,
{
    let mut items: Vec<ThreadItem<N>> = Vec::new();
    // Index of the item currently being extended; `None` is the placeholder.
    let mut current: Option<usize> = None;

    let mut next = next_in_order(root, root, true);
    while let Some(node) = next {
        if node
            .attribute("id")
            .is_some_and(|id| config.skip_ids.contains(&id))
        {
            next = next_in_order(&node, root, false);
            continue;
        }
        next = next_in_order(&node, root, true);

        if node.has_tag(HEADINGS) {
            items.push(ThreadItem::heading(Range::around_contents(&node)));
            current = Some(items.len() - 1);
            continue;
        }
        if node.node_type() != NodeType::Text {
            continue;
        }
        let Some(found) = matcher.find_in_node(&node) else {
            continue;
        };

        let previous_end = match current {
            Some(i) => items[i].range.end_container.clone(),
            None => root.clone(),
        };
        let signature = find_signature(&node, Some(&previous_end), resolver, config);
        let Some(author) = signature.author else {
            log::debug!(
                "ignoring timestamp without signature: {:?}",
                node.data().unwrap_or_default()
            );
            continue;
        };
        let (Some(first_sig), Some(last_sig)) = (signature.nodes.last(), signature.nodes.first())
        else {
            continue;
        };

        let start_node = next_interesting_leaf(&previous_end, root).unwrap_or_else(|| node.clone());
        let (Some(start_parent), Some(first_sig_parent)) = (start_node.parent(), first_sig.parent())
        else {
            continue;
        };
        let (end_container, end_offset) = if *last_sig == node {
            stitched_position(&node, found.end)
        } else {
            match last_sig.parent() {
                Some(parent) => (parent, last_sig.child_index() + 1),
                None => continue,
            }
        };
        let range = Range::new(
            start_parent,
            start_node.child_index(),
            end_container.clone(),
            end_offset,
        );
        let signature_range = Range::new(
            first_sig_parent,
            first_sig.child_index(),
            end_container,
            end_offset,
        );

        let start_level = indent_level(&start_node, root) + 1;
        let end_level = indent_level(&node, root) + 1;
        let level = start_level.min(end_level);

        // Several signatures on one line make one comment.
        if let Some(i) = current
            && !items[i].is_heading()
            && line_of(&node) == line_of(&items[i].range.end_container)
        {
            let item = &mut items[i];
            log::debug!("merging signature by {author} into previous comment");
            item.range.end_container = range.end_container;
            item.range.end_offset = range.end_offset;
            item.level = item.level.min(level);
            if let Some(comment) = item.as_comment_mut() {
                comment.signature_ranges.push(signature_range);
            }
            continue;
        }

        let timestamp = match matcher.parse(&found) {
            Ok(timestamp) => timestamp,
            Err(ParseError::InvalidDate(date)) => {
                log::warn!("ignoring signature by {author} with invalid date {date}");
                continue;
            }
            Err(e) => return Err(e),
        };
        let mut item = ThreadItem::comment(level, range, signature_range, timestamp, author);
        if start_level != end_level {
            item.warn(ItemWarning::DifferentIndentation);
        }
        if let Some(warning) = timestamp.warning {
            item.warn(warning);
        }
        items.push(item);
        current = Some(items.len() - 1);
    }

    if items.first().is_some_and(|first| !first.is_heading()) {
        items.insert(0, ThreadItem::placeholder(root));
    }
    Ok(items)
}

/// The list item or paragraph a node sits in, or its parent.
fn line_of<N: MarkupNode>(node: &N) -> Option<N> {
    closest_element(node, LINE_BLOCKS).or_else(|| node.parent())
}
