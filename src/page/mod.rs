//! Page parsing: turning fetched page content into topics, cards and links.
//!
//! - [`PageDocument`] - Parsed HTML tree with the queries the pipeline needs
//! - [`extract`] - Content to one topic plus unanswered cards
//! - [`discover_child_links`] - Same-site child page URLs of an index page

mod extractor;
mod links;

pub use extractor::{
    DEFAULT_DESCRIPTION, DEFAULT_TITLE, ExtractedPage, dedupe_adjacent, extract,
    extract_from_document, extract_plain_text,
};
pub use links::{discover_child_links, is_child_page_url};

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Marker whose presence makes content HTML rather than plain text.
const HTML_MARKER: &[u8] = b"<html";

fn compile_static_selector(selector: &str) -> Selector {
    Selector::parse(selector)
        .unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e:?}"))
}

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("title"));
static MAIN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("main"));
static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("body"));
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a[href]"));
static CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    compile_static_selector("h1, h2, h3, p, li, blockquote, pre, code")
});

/// Returns true when `content` should be parsed as an HTML document.
///
/// The `<html` marker matches in any ASCII case, so `<HTML>` pages parse too.
#[must_use]
pub fn is_html(content: &str) -> bool {
    content
        .as_bytes()
        .windows(HTML_MARKER.len())
        .any(|window| window.eq_ignore_ascii_case(HTML_MARKER))
}

/// A parsed HTML page.
///
/// Parsing never fails: malformed markup is recovered the way browsers do.
pub struct PageDocument {
    html: Html,
}

impl std::fmt::Debug for PageDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageDocument").finish_non_exhaustive()
    }
}

impl PageDocument {
    /// Parses `content` as an HTML document.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        Self {
            html: Html::parse_document(content),
        }
    }

    /// Trimmed text of the `<title>` element, if present and non-empty.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.html
            .select(&TITLE_SELECTOR)
            .next()
            .map(|title| text_content(title).trim().to_string())
            .filter(|title| !title.is_empty())
    }

    /// Trimmed, non-empty text of every content element in document order.
    ///
    /// Content elements are headings (levels 1-3), paragraphs, list items,
    /// blockquotes and code blocks inside `<main>`, or inside `<body>` when
    /// the page has no main region.
    #[must_use]
    pub fn content_texts(&self) -> Vec<String> {
        let region = self
            .html
            .select(&MAIN_SELECTOR)
            .next()
            .or_else(|| self.html.select(&BODY_SELECTOR).next())
            .unwrap_or_else(|| self.html.root_element());

        region
            .select(&CONTENT_SELECTOR)
            .map(|element| text_content(element).trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Raw `href` values of all anchors, in document order.
    #[must_use]
    pub fn anchor_hrefs(&self) -> Vec<String> {
        self.html
            .select(&ANCHOR_SELECTOR)
            .filter_map(|anchor| anchor.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}

fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}
