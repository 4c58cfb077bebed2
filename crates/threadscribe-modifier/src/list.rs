//! Creating list items at a given reply depth.

use std::sync::LazyLock;

use regex::Regex;
use threadscribe_core::{
    ItemId, MarkupNode, ModifyError, NodeType, Range, Threads, closest_element, html_trim,
    indent_level,
};

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\r?\n){2,}").unwrap());

const LINE_BLOCKS: &[&str] = &["li", "dd", "p"];
const LIST_ITEMS: &[&str] = &["li", "dd"];
const ITEM_TAG: &str = "dd";
const LIST_TAG: &str = "dl";

/// Mark a new list item so Parsoid does not emit whitespace before it,
/// which would break the nesting of following lists.
fn suppress_leading_whitespace<N: MarkupNode>(item: &N) {
    item.set_attribute("data-parsoid", "{}");
}

/// Innermost node at the end of a range.
fn end_node<N: MarkupNode>(range: &Range<N>) -> N {
    let container = &range.end_container;
    match container.node_type() {
        NodeType::Element | NodeType::Document if range.end_offset > 0 => container
            .children()
            .get(range.end_offset - 1)
            .cloned()
            .unwrap_or_else(|| container.clone()),
        _ => container.clone(),
    }
}

/// Move every sibling after `target` into a shallow clone of `parent`
/// placed right after `parent`.
fn split_after<N: MarkupNode>(target: &N, parent: &N) -> Result<(), ModifyError> {
    if target.next_sibling().is_none() {
        return Ok(());
    }
    let grandparent = parent.parent().ok_or(ModifyError::NoInsertionPoint)?;
    let clone = parent.clone_shallow();
    grandparent.insert_after(&clone, parent);
    while let Some(next) = target.next_sibling() {
        clone.append_child(&next);
    }
    Ok(())
}

/// Create a list item for a reply to `comment`, placed after all existing
/// replies, at indentation level `comment.level + 1`.
pub fn add_list_item<N: MarkupNode>(
    threads: &Threads<N>,
    comment: ItemId,
) -> Result<N, ModifyError> {
    let item = threads.item(comment);
    if item.is_heading() {
        return Err(ModifyError::NotAComment);
    }
    let root = threads.root();
    let last = threads.item(threads.deepest_last_reply(comment));
    let desired_level = item.level + 1;

    // Find a block we can restructure and the inline node within it.
    let mut target = end_node(&last.range);
    let enclosing = target.parent().ok_or(ModifyError::Detached)?;
    let mut parent = closest_element(&enclosing, LINE_BLOCKS).unwrap_or(enclosing);
    while target.parent().as_ref() != Some(&parent) {
        target = target.parent().ok_or(ModifyError::NoInsertionPoint)?;
    }

    let mut level = indent_level(&target, root) + 1;
    let mut new_item = None;

    if level < desired_level {
        // Insert replies outside a frame that wraps the whole comment.
        if level == 1
            && let Some(covered) = last.range.fully_covered_siblings(root)
            && let Some(outer) = covered.last()
        {
            target = outer.clone();
            parent = target.parent().ok_or(ModifyError::Detached)?;
        }

        // Lists cannot nest inside these.
        if parent.has_tag(&["p", "pre"]) {
            target = parent;
            parent = target.parent().ok_or(ModifyError::NoInsertionPoint)?;
        }

        // Step over trailing markup comments (and the whitespace between
        // them), but never across a blank line.
        let mut pointer = target.clone();
        while let Some(next) = pointer.next_sibling() {
            let skippable = match next.node_type() {
                NodeType::Comment => true,
                NodeType::Text => {
                    let data = next.data().unwrap_or_default();
                    html_trim(&data).is_empty() && !BLANK_LINES.is_match(&data)
                }
                _ => false,
            };
            if !skippable {
                break;
            }
            if next.node_type() == NodeType::Comment {
                target = next.clone();
            }
            pointer = next;
        }

        let mut anchor = Some(target);
        let mut container = parent;
        while level < desired_level {
            let list = container.create_element(LIST_TAG);
            let list_item = container.create_element(ITEM_TAG);
            suppress_leading_whitespace(&list_item);
            match &anchor {
                Some(after) => container.insert_after(&list, after),
                None => container.append_child(&list),
            }
            list.append_child(&list_item);

            // Further levels nest inside the item just created.
            anchor = None;
            container = list_item.clone();
            new_item = Some(list_item);
            level += 1;
        }
        log::debug!("nested reply list for {comment:?} at level {desired_level}");
    } else {
        // Split ancestors after the target until we are one level up.
        loop {
            split_after(&target, &parent)?;
            target = parent;
            parent = target.parent().ok_or(ModifyError::NoInsertionPoint)?;
            if target.has_tag(LIST_ITEMS) {
                level -= 1;
            }
            if level < desired_level {
                break;
            }
        }

        // `target` is now a list item in `parent`.
        if target.has_tag(&[ITEM_TAG]) {
            let list_item = target.create_element(ITEM_TAG);
            suppress_leading_whitespace(&list_item);
            parent.insert_after(&list_item, &target);
            new_item = Some(list_item);
        } else {
            // Wrong kind of list: split it and put a list of ours between.
            split_after(&target, &parent)?;
            target = parent;
            parent = target.parent().ok_or(ModifyError::NoInsertionPoint)?;

            let list = target.create_element(LIST_TAG);
            let list_item = target.create_element(ITEM_TAG);
            suppress_leading_whitespace(&list_item);
            parent.insert_after(&list, &target);
            list.append_child(&list_item);
            new_item = Some(list_item);
        }
        log::debug!("sibling reply item for {comment:?} at level {desired_level}");
    }

    new_item.ok_or(ModifyError::NoInsertionPoint)
}

/// Create another list item of the same kind right after `previous`.
pub fn add_sibling_list_item<N: MarkupNode>(previous: &N) -> Result<N, ModifyError> {
    let parent = previous.parent().ok_or(ModifyError::Detached)?;
    let item = previous.create_element(previous.tag_name().unwrap_or(ITEM_TAG));
    suppress_leading_whitespace(&item);
    parent.insert_after(&item, previous);
    Ok(item)
}
