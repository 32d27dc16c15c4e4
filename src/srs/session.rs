//! Review session over one topic's cards.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use super::{Scheduler, select_next};
use crate::deck::{Card, DeckRepository, Result, SrsRecord, Timestamp};

/// The cards of one topic, a cursor, and a per-session cache of their
/// mastery records.
///
/// The cache is rebuilt by [`ReviewSession::load`] and updated after every
/// answer, so selecting the next card never goes back to the store.
pub struct ReviewSession<'a, R: DeckRepository + ?Sized> {
    repo: &'a R,
    cards: Vec<Card>,
    index: usize,
    records: HashMap<String, SrsRecord>,
}

impl<'a, R: DeckRepository + ?Sized> ReviewSession<'a, R> {
    /// Loads a topic's cards and their records, positioned on the first card
    /// to review.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DeckError`] if the cards or records cannot be read.
    #[instrument(skip(repo))]
    pub async fn load(repo: &'a R, topic_id: &str, now: Timestamp) -> Result<Self> {
        let cards = repo.list_cards_by_topic(topic_id).await?;
        let mut records = HashMap::with_capacity(cards.len());
        for card in &cards {
            if let Some(record) = repo.get_srs_record(&card.id).await? {
                records.insert(card.id.clone(), record);
            }
        }

        let index = select_next(&cards, None, &records, now);
        debug!(
            cards = cards.len(),
            reviewed = records.len(),
            index,
            "Review session loaded"
        );

        Ok(Self {
            repo,
            cards,
            index,
            records,
        })
    }

    /// Returns true when the topic has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Cursor position of the card currently shown.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Card currently shown, if the topic has any.
    #[must_use]
    pub fn current(&self) -> Option<&Card> {
        self.cards.get(self.index)
    }

    /// Cached record of the current card.
    #[must_use]
    pub fn current_record(&self) -> Option<&SrsRecord> {
        self.current().and_then(|card| self.records.get(&card.id))
    }

    /// Cards due at `now`, counting never-reviewed cards as due.
    #[must_use]
    pub fn due_count(&self, now: Timestamp) -> usize {
        self.cards
            .iter()
            .filter(|card| {
                self.records
                    .get(&card.id)
                    .is_none_or(|record| record.is_due(now))
            })
            .count()
    }

    /// Records the answer to the current card and moves to the next one.
    ///
    /// Returns the updated record, or `None` for an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DeckError`] if the record cannot be persisted; the
    /// cursor does not move in that case.
    pub async fn answer(&mut self, was_correct: bool, now: Timestamp) -> Result<Option<SrsRecord>> {
        let Some(card_id) = self.current().map(|card| card.id.clone()) else {
            return Ok(None);
        };

        let record = Scheduler::new(self.repo)
            .record_review(&card_id, was_correct, now)
            .await?;
        self.records.insert(card_id, record.clone());
        self.index = select_next(&self.cards, Some(self.index), &self.records, now);
        Ok(Some(record))
    }

    /// Replaces the question and answer of the current card.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DeckError`] if the card cannot be written.
    pub async fn edit_current(&mut self, question: &str, answer: &str) -> Result<()> {
        let Some(card) = self.cards.get(self.index) else {
            return Ok(());
        };

        let edited = Card {
            question: question.to_string(),
            answer: answer.to_string(),
            ..card.clone()
        };
        self.repo.upsert_card(&edited).await?;
        self.cards[self.index] = edited;
        Ok(())
    }

    /// Shuffles the card order uniformly and reselects the first card.
    pub fn shuffle<G: Rng + ?Sized>(&mut self, rng: &mut G, now: Timestamp) {
        self.cards.shuffle(rng);
        self.index = select_next(&self.cards, None, &self.records, now);
    }
}
