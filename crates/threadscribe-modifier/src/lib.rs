//! Reply insertion for threadscribe.
//!
//! Structural surgery on the markup tree a [`Threads`] was parsed from:
//! - [`add_list_item`] creates an empty list item at the reply depth of a
//!   comment, after all existing replies
//! - [`unwrap_list`] turns a list back into paragraphs
//! - [`add_reply_link`] places a reply control at the end of a comment
//! - [`add_reply`], [`add_wikitext_reply`] and [`add_html_reply`] move
//!   composed content into new list items
//!
//! Every mutation invalidates the ranges of the [`Threads`] it was given;
//! parse again before the next operation.
//!
//! [`Threads`]: threadscribe_core::Threads

mod list;
mod reply;
mod signing;
#[cfg(test)]
mod test_support;
mod unwrap;

pub use list::{add_list_item, add_sibling_list_item};
pub use reply::{add_html_reply, add_reply, add_reply_link, add_wikitext_reply};
pub use signing::{
    append_signature, auto_sign_wikitext, create_wikitext_node, is_html_signed,
    is_wikitext_signed, strip_redundant_linebreaks,
};
pub use unwrap::unwrap_list;
