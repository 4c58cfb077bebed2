//! Linking the flat item list into reply trees.

use std::collections::HashMap;

use threadscribe_core::{ItemId, ItemWarning, MarkupNode, ThreadItem, Threads};

/// Assign comment ids and connect every comment to the closest preceding
/// item one indentation level up.
///
/// Ids are `author|timestamp|n`, where `n` is the smallest number that
/// makes the id unique on the page.
pub fn build_threads<N: MarkupNode>(root: N, mut items: Vec<ThreadItem<N>>) -> Threads<N> {
    let mut by_id: HashMap<String, ItemId> = HashMap::new();
    let mut headings = Vec::new();
    // Most recent item at each level; index 0 holds the current heading.
    let mut open: Vec<Option<ItemId>> = Vec::new();

    for index in 0..items.len() {
        let id = ItemId(index);

        if let Some(comment) = items[index].as_comment() {
            let base = format!("{}|{}", comment.author, comment.timestamp.to_iso());
            let mut number = 0;
            while by_id.contains_key(&format!("{base}|{number}")) {
                number += 1;
            }
            let key = format!("{base}|{number}");
            by_id.insert(key.clone(), id);
            items[index].id = Some(key);
        }

        let level = items[index].level;
        if open.len() < level {
            // Pretend the last open item spans the skipped levels so later
            // replies still connect.
            items[index].warn(ItemWarning::SkipsIndentation);
            let last = open.last().copied().flatten();
            open.resize(level, last);
        }

        if items[index].is_heading() {
            headings.push(id);
        } else if let Some(parent) = level.checked_sub(1).and_then(|l| open[l]) {
            items[index].parent = Some(parent);
            items[parent.0].replies.push(id);
        } else {
            log::debug!("comment {id:?} has no thread to attach to");
            items[index].warn(ItemWarning::Unconnected);
        }

        open.truncate(level);
        open.push(Some(id));
    }

    Threads::from_parts(root, items, headings, by_id)
}
