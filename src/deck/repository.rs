//! Repository seam for deck persistence operations.
//!
//! The scheduler and review session depend on this trait rather than on
//! [`Deck`] directly, so they can run against any keyed store.

use async_trait::async_trait;

use super::{Card, Deck, ImportPayload, Result, SrsRecord, Topic};

/// Data-access contract for topics, cards and mastery records.
#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// Lists all topics sorted by name.
    async fn list_topics(&self) -> Result<Vec<Topic>>;

    /// Lists the cards of one topic.
    async fn list_cards_by_topic(&self, topic_id: &str) -> Result<Vec<Card>>;

    /// Inserts or replaces a card.
    async fn upsert_card(&self, card: &Card) -> Result<()>;

    /// Wipes topics and cards, keeping mastery records.
    async fn clear_all(&self) -> Result<()>;

    /// Returns the mastery record for a card, if any.
    async fn get_srs_record(&self, card_id: &str) -> Result<Option<SrsRecord>>;

    /// Inserts or replaces a mastery record.
    async fn upsert_srs_record(&self, record: &SrsRecord) -> Result<()>;

    /// Writes a whole payload in one atomic batch.
    async fn bulk_import(&self, payload: &ImportPayload) -> Result<()>;
}

#[async_trait]
impl DeckRepository for Deck {
    async fn list_topics(&self) -> Result<Vec<Topic>> {
        Deck::list_topics(self).await
    }

    async fn list_cards_by_topic(&self, topic_id: &str) -> Result<Vec<Card>> {
        Deck::list_cards_by_topic(self, topic_id).await
    }

    async fn upsert_card(&self, card: &Card) -> Result<()> {
        Deck::upsert_card(self, card).await
    }

    async fn clear_all(&self) -> Result<()> {
        Deck::clear_all(self).await
    }

    async fn get_srs_record(&self, card_id: &str) -> Result<Option<SrsRecord>> {
        Deck::get_srs_record(self, card_id).await
    }

    async fn upsert_srs_record(&self, record: &SrsRecord) -> Result<()> {
        Deck::upsert_srs_record(self, record).await
    }

    async fn bulk_import(&self, payload: &ImportPayload) -> Result<()> {
        Deck::bulk_import(self, payload).await
    }
}
