//! Recovering the author of a comment from the links before its timestamp.

use std::net::Ipv6Addr;

use threadscribe_core::{LocaleConfig, MarkupNode, TitleResolver};

/// Result of a backward signature scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature<N> {
    /// Sibling nodes making up the signature in reverse document order;
    /// the first is the timestamp node (or the link wrapping it).
    pub nodes: Vec<N>,
    /// Username, or `None` when no user link was found.
    pub author: Option<String>,
}

/// Scan backwards from a timestamp text node for a user signature.
///
/// Stops after `config.signature_scan_limit` characters of text or on
/// reaching `until`. The first user link found fixes the author; further
/// nodes only extend the signature when one of their links points to the
/// same user.
pub fn find_signature<N, R>(
    timestamp_node: &N,
    until: Option<&N>,
    resolver: &R,
    config: &LocaleConfig,
) -> Signature<N>
where
    N: MarkupNode,
    R: TitleResolver + ?Sized,
{
    let mut start = timestamp_node.clone();
    // A timestamp linked to its diff: scan from the link instead.
    if start.previous_sibling().is_none()
        && start.next_sibling().is_none()
        && let Some(parent) = start.parent()
        && parent.has_tag(&["a"])
    {
        start = parent;
    }

    let mut nodes = vec![start.clone()];
    let mut author: Option<String> = None;
    let mut length = 0;
    let mut last_link_node = start.clone();

    let mut node = start;
    while let Some(prev) = node.previous_sibling() {
        if length >= config.signature_scan_limit || until == Some(&prev) {
            break;
        }
        node = prev;
        nodes.push(node.clone());
        length += node.text_content().chars().count();
        if !node.is_element() {
            continue;
        }

        let links = if node.has_tag(&["a"]) {
            vec![node.clone()]
        } else {
            let mut links = Vec::new();
            collect_links(&node, &mut links);
            links
        };

        // Any one matching link is enough; vanity links may sit alongside.
        let matched = links.iter().any(|link| {
            let Some(username) = link_username(link, resolver, config) else {
                return false;
            };
            let author = author.get_or_insert_with(|| username.clone());
            *author == username
        });
        if matched {
            last_link_node = node.clone();
        }
    }

    while nodes.last().is_some_and(|last| *last != last_link_node) {
        nodes.pop();
    }

    Signature { nodes, author }
}

/// Descendant `<a>` elements in document order.
fn collect_links<N: MarkupNode>(node: &N, links: &mut Vec<N>) {
    for child in node.children() {
        if child.has_tag(&["a"]) {
            links.push(child.clone());
        }
        collect_links(&child, links);
    }
}

/// Username a link points to, if it targets a user page, user talk page or
/// a contributions page.
fn link_username<N, R>(link: &N, resolver: &R, config: &LocaleConfig) -> Option<String>
where
    N: MarkupNode,
    R: TitleResolver + ?Sized,
{
    let href = link.attribute("href")?;
    let title = resolver.title_from_href(&href)?;
    let ids = config.namespace_ids;

    let username = if title.namespace == ids.user || title.namespace == ids.user_talk {
        if title.main_text.contains('/') {
            return None;
        }
        title.main_text
    } else if title.namespace == ids.special {
        let (page, user) = title.main_text.split_once('/')?;
        if page != config.special_contributions_name {
            return None;
        }
        // Contributions links may carry an unnormalized name.
        resolver.make_title(ids.user, user)?.main_text
    } else {
        return None;
    };

    if username.is_empty() {
        return None;
    }
    if username.parse::<Ipv6Addr>().is_ok() {
        return Some(username.to_uppercase());
    }
    Some(username)
}
