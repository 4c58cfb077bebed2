//! Default link-to-title resolution for MediaWiki URLs.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use threadscribe_core::{LocaleConfig, ParseError, Title, TitleResolver};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());
static ILLEGAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[<>\[\]{}|#]").unwrap());

/// Resolves hrefs of a single wiki into titles, using the wiki's article
/// path and namespace names from [`LocaleConfig`].
///
/// Understands Parsoid's relative `./Title` links, article-path links
/// (`/wiki/Title`, optionally with scheme and host) and `index.php` links
/// carrying a `title=` query parameter.
#[derive(Debug, Clone)]
pub struct SiteTitles {
    article_path: Regex,
    namespaces: BTreeMap<String, i32>,
}

impl SiteTitles {
    pub fn new(config: &LocaleConfig) -> Result<Self, ParseError> {
        let (before, after) = config.article_path.split_once("$1").ok_or_else(|| {
            ParseError::InvalidConfig(format!(
                "article path has no $1 placeholder: {}",
                config.article_path
            ))
        })?;
        let article_path = Regex::new(&format!(
            "^{}(.*){}$",
            regex::escape(before),
            regex::escape(after)
        ))
        .map_err(|e| ParseError::InvalidConfig(format!("article path: {e}")))?;
        let namespaces = config
            .namespace_names
            .iter()
            .map(|(name, &id)| (normalize(name).to_lowercase(), id))
            .collect();
        Ok(Self {
            article_path,
            namespaces,
        })
    }

    /// Parse prefixed title text such as `User talk:Example`.
    pub fn new_from_text(&self, text: &str) -> Option<Title> {
        let text = normalize(text);
        let text = text.strip_prefix(':').unwrap_or(&text);
        let (namespace, main) = match text.split_once(':') {
            Some((prefix, rest)) => match self.namespaces.get(&prefix.trim().to_lowercase()) {
                Some(&id) => (id, rest.trim_start()),
                None => (0, text),
            },
            None => (0, text),
        };
        self.make_title(namespace, main)
    }
}

impl TitleResolver for SiteTitles {
    fn title_from_href(&self, href: &str) -> Option<Title> {
        let (path, query) = split_url(href);
        if let Some(relative) = path.strip_prefix("./") {
            return self.new_from_text(&decode(relative)?);
        }
        if let Some(caps) = self.article_path.captures(path) {
            return self.new_from_text(&decode(&caps[1])?);
        }
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("title="))
            .and_then(|title| decode(&title.replace('+', " ")))
            .and_then(|title| self.new_from_text(&title))
    }

    fn make_title(&self, namespace: i32, text: &str) -> Option<Title> {
        let main = normalize(text);
        if main.is_empty() || ILLEGAL.is_match(&main) {
            return None;
        }
        Some(Title {
            namespace,
            main_text: upper_first(&main),
        })
    }
}

/// Path and query of a URL, dropping scheme, host and fragment.
fn split_url(href: &str) -> (&str, &str) {
    let href = href.split('#').next().unwrap_or_default();
    let rest = match href.find("://") {
        Some(i) => strip_host(&href[i + 3..]),
        None => match href.strip_prefix("//") {
            Some(after) => strip_host(after),
            None => href,
        },
    };
    rest.split_once('?').unwrap_or((rest, ""))
}

fn strip_host(url: &str) -> &str {
    url.find('/').map_or("", |i| &url[i..])
}

/// Percent-decode; invalid UTF-8 yields no title.
fn decode(text: &str) -> Option<String> {
    urlencoding::decode(text).ok().map(Cow::into_owned)
}

/// Underscores and whitespace runs become single spaces, then trim.
fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
