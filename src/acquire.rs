//! Acquisition orchestrator: a root URL in, an import payload out.
//!
//! A root page that links to child pages is treated as an index: every
//! child becomes its own topic and the root's own text is dropped. A root
//! without child links (or whose children all fail) becomes a single topic.

use tracing::{info, instrument, warn};

use crate::deck::ImportPayload;
use crate::fetch::PageFetcher;
use crate::page::{self, PageDocument, discover_child_links, extract_from_document};

/// Counters for one acquisition run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquireStats {
    /// Child links found on the root page.
    pub children_found: usize,
    /// Child pages whose fetch failed.
    pub children_skipped: usize,
    /// Topics in the resulting payload.
    pub topics: usize,
    /// Cards in the resulting payload.
    pub cards: usize,
}

/// Builds import payloads by fetching and extracting pages.
#[derive(Debug)]
pub struct Acquirer<F> {
    fetcher: F,
}

/// What the root page turned out to be.
enum RootPage {
    /// Index page: fetch these children.
    Index(Vec<String>),
    /// A page to import by itself.
    Single(ImportPayload),
}

impl<F: PageFetcher> Acquirer<F> {
    /// Creates an acquirer fetching through `fetcher`.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Returns the underlying fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches `root_url` (and its child pages) and builds the import payload.
    ///
    /// Returns `None` only when the root page itself cannot be fetched.
    #[instrument(skip(self))]
    pub async fn acquire(&self, root_url: &str) -> Option<ImportPayload> {
        self.acquire_with_stats(root_url)
            .await
            .map(|(payload, _)| payload)
    }

    /// Like [`Acquirer::acquire`], also returning run counters.
    #[instrument(skip(self))]
    pub async fn acquire_with_stats(&self, root_url: &str) -> Option<(ImportPayload, AcquireStats)> {
        let Some(root) = self.fetcher.fetch(root_url).await else {
            warn!("Root page unavailable; nothing imported");
            return None;
        };

        let mut stats = AcquireStats::default();
        let children = match classify_root(&root, root_url) {
            RootPage::Single(payload) => return Some(finish(payload, stats)),
            RootPage::Index(children) => children,
        };
        stats.children_found = children.len();

        let mut payload = ImportPayload::default();
        for child_url in &children {
            let Some(content) = self.fetcher.fetch(child_url).await else {
                warn!(url = %child_url, "Child page unavailable; skipping");
                stats.children_skipped += 1;
                continue;
            };
            let extracted = page::extract(&content);
            payload.push_topic(extracted.topic, extracted.cards);
        }

        if payload.topics.is_empty() {
            info!("No child page yielded a topic; importing the root page itself");
            let root_page = page::extract(&root);
            payload.push_topic(root_page.topic, root_page.cards);
        }

        Some(finish(payload, stats))
    }
}

/// Decides between index and single page without holding the parsed tree
/// across any await point.
fn classify_root(content: &str, root_url: &str) -> RootPage {
    if !page::is_html(content) {
        let extracted = page::extract_plain_text(content);
        return RootPage::Single(single_topic(extracted));
    }

    let document = PageDocument::parse(content);
    let children = discover_child_links(&document, root_url);
    if children.is_empty() {
        RootPage::Single(single_topic(extract_from_document(&document)))
    } else {
        RootPage::Index(children)
    }
}

fn single_topic(extracted: page::ExtractedPage) -> ImportPayload {
    let mut payload = ImportPayload::default();
    payload.push_topic(extracted.topic, extracted.cards);
    payload
}

fn finish(payload: ImportPayload, mut stats: AcquireStats) -> (ImportPayload, AcquireStats) {
    stats.topics = payload.topics.len();
    stats.cards = payload.cards.len();
    info!(
        topics = stats.topics,
        cards = stats.cards,
        children_found = stats.children_found,
        children_skipped = stats.children_skipped,
        "Acquisition complete"
    );
    (payload, stats)
}
