//! Page content to topic and candidate cards.

use tracing::{debug, instrument};

use super::{PageDocument, is_html};
use crate::deck::{Card, Topic};

/// Topic name used when a page has no usable title.
pub const DEFAULT_TITLE: &str = "Notion";

/// Description attached to every extracted topic.
pub const DEFAULT_DESCRIPTION: &str = "Imported from Notion";

/// Minimum length (in characters, exclusive) of a plain-text title line.
const MIN_PLAIN_TITLE_CHARS: usize = 5;

/// One page turned into a topic and its unanswered cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// The page's topic, with a freshly generated id.
    pub topic: Topic,
    /// One card per surviving text block; every `topic_id` is `topic.id`.
    pub cards: Vec<Card>,
}

impl ExtractedPage {
    fn from_texts(title: String, texts: Vec<String>) -> Self {
        let topic = Topic::new(title, Some(DEFAULT_DESCRIPTION.to_string()));
        let cards = dedupe_adjacent(texts)
            .into_iter()
            .map(|question| Card::unanswered(topic.id.clone(), question))
            .collect();
        Self { topic, cards }
    }

    /// Card questions in page order.
    #[must_use]
    pub fn questions(&self) -> Vec<&str> {
        self.cards.iter().map(|card| card.question.as_str()).collect()
    }
}

/// Extracts a topic and its cards from HTML or plain-text content.
///
/// Always yields a topic; a page without usable text yields zero cards.
#[must_use]
#[instrument(skip(content), fields(bytes = content.len()))]
pub fn extract(content: &str) -> ExtractedPage {
    let page = if is_html(content) {
        extract_from_document(&PageDocument::parse(content))
    } else {
        extract_plain_text(content)
    };
    debug!(
        title = %page.topic.name,
        cards = page.cards.len(),
        "Extracted page"
    );
    page
}

/// Extracts a topic and its cards from an already parsed HTML page.
#[must_use]
pub fn extract_from_document(document: &PageDocument) -> ExtractedPage {
    let title = document
        .title()
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    ExtractedPage::from_texts(title, document.content_texts())
}

/// Extracts a topic and its cards from plain text, one card per non-empty line.
///
/// The title is the first line longer than five characters, counted as
/// `char`s rather than UTF-16 units.
#[must_use]
pub fn extract_plain_text(content: &str) -> ExtractedPage {
    let lines: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let title = lines
        .iter()
        .find(|line| line.chars().count() > MIN_PLAIN_TITLE_CHARS)
        .cloned()
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    ExtractedPage::from_texts(title, lines)
}

/// Collapses runs of identical adjacent strings into one.
///
/// Only the previous kept entry is compared, so repeats further apart survive.
#[must_use]
pub fn dedupe_adjacent(texts: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(texts.len());
    for text in texts {
        if kept.last() != Some(&text) {
            kept.push(text);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_dedupe_adjacent_only_collapses_neighbours() {
        assert_eq!(
            dedupe_adjacent(strings(&["A", "A", "B", "A"])),
            strings(&["A", "B", "A"])
        );
        assert_eq!(
            dedupe_adjacent(strings(&["x", "x", "x"])),
            strings(&["x"])
        );
        assert!(dedupe_adjacent(Vec::new()).is_empty());
    }

    #[test]
    fn test_extract_html_page() {
        let html = "<html><head><title> Derivatives </title></head><body><main>\
            <h1>Derivatives</h1><h1>Derivatives</h1><p>Define the derivative.</p>\
            <ul><li>Chain rule</li><li>Product rule</li></ul><p>Derivatives</p></main></body></html>";

        let page = extract(html);

        assert_eq!(page.topic.name, "Derivatives");
        assert_eq!(page.topic.description.as_deref(), Some(DEFAULT_DESCRIPTION));
        assert_eq!(
            page.questions(),
            vec![
                "Derivatives",
                "Define the derivative.",
                "Chain rule",
                "Product rule",
                "Derivatives"
            ]
        );
        assert!(page.cards.iter().all(|c| c.topic_id == page.topic.id));
        assert!(page.cards.iter().all(|c| c.answer.is_empty()));
    }

    #[test]
    fn test_extract_html_without_title_uses_default() {
        let page = extract("<html><body><p>Only text</p></body></html>");
        assert_eq!(page.topic.name, DEFAULT_TITLE);
        assert_eq!(page.questions(), vec!["Only text"]);
    }

    #[test]
    fn test_extract_html_without_content_yields_zero_cards() {
        let page = extract("<html><head><title>Empty</title></head><body><div></div></body></html>");
        assert_eq!(page.topic.name, "Empty");
        assert!(page.cards.is_empty());
    }

    #[test]
    fn test_extract_plain_text_title_and_lines() {
        let text = "Q1\r\n\r\n  Ticket 1: Limits  \nWhat is a limit?\n\n\nWhat is a limit?\nQ1\n";

        let page = extract(text);

        assert_eq!(page.topic.name, "Ticket 1: Limits");
        assert_eq!(
            page.questions(),
            vec!["Q1", "Ticket 1: Limits", "What is a limit?", "Q1"]
        );
    }

    #[test]
    fn test_extract_plain_text_short_lines_use_default_title() {
        let page = extract("abc\nhello\n12345");
        assert_eq!(page.topic.name, DEFAULT_TITLE);
        assert_eq!(page.cards.len(), 3);
    }

    #[test]
    fn test_plain_text_title_length_counts_chars() {
        let page = extract("🎓🎓🎓\nЛимит");
        assert_eq!(page.topic.name, DEFAULT_TITLE);

        let page = extract("🎓🎓🎓\nПредел");
        assert_eq!(page.topic.name, "Предел");
    }

    #[test]
    fn test_extract_empty_content() {
        let page = extract("");
        assert_eq!(page.topic.name, DEFAULT_TITLE);
        assert!(page.cards.is_empty());
    }

    #[test]
    fn test_extract_generates_fresh_ids() {
        let first = extract("Some line of text");
        let second = extract("Some line of text");
        assert_ne!(first.topic.id, second.topic.id);
        assert_ne!(first.cards[0].id, second.cards[0].id);
        assert_eq!(first.questions(), second.questions());
    }
}
