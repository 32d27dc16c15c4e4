//! Deck record types: topics, cards, mastery records and import payloads.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Generates a fresh opaque identifier for a topic or card.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A named group of cards, typically one source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Topic {
    /// Unique identifier.
    pub id: String,
    /// Display name (page title).
    pub name: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Topic {
    /// Creates a topic with a freshly generated id.
    #[must_use]
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            description,
        }
    }
}

/// A single question/answer unit belonging to one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Card {
    /// Unique identifier.
    pub id: String,
    /// Owning topic.
    pub topic_id: String,
    /// Prompt shown to the reviewer.
    pub question: String,
    /// Expected answer; empty for freshly extracted cards.
    #[serde(default)]
    pub answer: String,
}

impl Card {
    /// Creates an unanswered card for `topic_id` with a freshly generated id.
    #[must_use]
    pub fn unanswered(topic_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            topic_id: topic_id.into(),
            question: question.into(),
            answer: String::new(),
        }
    }
}

/// Spaced-repetition mastery state for one card.
///
/// Absence of a record means the card has never been reviewed and is due now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsRecord {
    /// The card this record belongs to.
    pub card_id: String,
    /// Mastery level, `0..=10`.
    pub level: u8,
    /// When the card becomes due again.
    pub next_due: Timestamp,
}

impl SrsRecord {
    /// Returns true when the card is due at `now`.
    #[must_use]
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_due <= now
    }
}

/// Topics and cards written to the store in one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPayload {
    /// Topics in the batch.
    #[serde(default)]
    pub topics: Vec<Topic>,
    /// Cards in the batch; each references a topic of this or an earlier batch.
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl ImportPayload {
    /// Returns true when the payload carries neither topics nor cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() && self.cards.is_empty()
    }

    /// Appends one topic together with its cards.
    pub fn push_topic(&mut self, topic: Topic, cards: Vec<Card>) {
        self.topics.push(topic);
        self.cards.extend(cards);
    }
}
