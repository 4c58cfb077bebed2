//! Flattening lists back into paragraphs.

use threadscribe_core::{MarkupNode, ModifyError, is_block_element, transcluded_from_element};

/// Replace a `dl`/`ol`/`ul` with its contents: inline content of each item
/// goes into a new paragraph, block children are kept as they are.
///
/// Anything that is not a list, or a list produced by a template, is left
/// alone.
pub fn unwrap_list<N: MarkupNode>(list: &N) -> Result<(), ModifyError> {
    if !list.has_tag(&["dl", "ol", "ul"]) {
        return Ok(());
    }
    if transcluded_from_element(list).is_some() {
        log::debug!("not unwrapping transcluded list");
        return Ok(());
    }
    let container = list.parent().ok_or(ModifyError::Detached)?;

    // Extracted nodes go after `reference`, which starts as the list itself.
    let mut reference = list.clone();
    let place = |node: &N, reference: &mut N| {
        container.insert_after(node, reference);
        *reference = node.clone();
    };

    while let Some(item) = list.first_child() {
        if !item.is_element() {
            // Whitespace or markup comments between items.
            place(&item, &mut reference);
            continue;
        }

        let mut paragraph = list.create_element("p");
        while let Some(child) = item.first_child() {
            if is_block_element(&child) {
                if paragraph.first_child().is_some() {
                    place(&paragraph, &mut reference);
                    paragraph = list.create_element("p");
                }
                place(&child, &mut reference);
            } else {
                paragraph.append_child(&child);
            }
        }
        if paragraph.first_child().is_some() {
            place(&paragraph, &mut reference);
        }
        list.remove_child(&item);
    }

    container.remove_child(list);
    Ok(())
}
