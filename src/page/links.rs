//! Child page discovery for wiki index pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};
use url::Url;

use super::PageDocument;

fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Hosts serving public Notion pages.
static NOTION_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?i)notion\.(site|so)$"));

/// Notion page ids are 32 hex characters somewhere in the path.
static PAGE_ID_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)[a-f0-9]{32}"));

/// Returns true when `url` is a Notion-hosted URL whose path carries a page id.
#[must_use]
pub fn is_child_page_url(url: &Url) -> bool {
    url.host_str().is_some_and(|host| NOTION_HOST_RE.is_match(host))
        && PAGE_ID_RE.is_match(url.path())
}

/// Finds child page links of `document`, resolved against `base_url`.
///
/// Returns absolute URLs in first-seen order, deduplicated by exact string.
/// Hrefs that do not resolve are skipped, and an unparsable base URL yields
/// no links.
#[must_use]
#[instrument(skip(document))]
pub fn discover_child_links(document: &PageDocument, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        debug!("Base URL is not absolute; no child links");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for href in document.anchor_hrefs() {
        let Ok(resolved) = base.join(&href) else {
            continue;
        };
        if !is_child_page_url(&resolved) {
            continue;
        }
        let link = resolved.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    debug!(count = links.len(), "Discovered child links");
    links
}
