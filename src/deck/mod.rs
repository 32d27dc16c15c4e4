//! Deck module for topic, card and mastery-record persistence.
//!
//! This module provides the `SQLite`-backed store behind the review loop
//! and the acquisition pipeline.
//!
//! # Overview
//!
//! - [`Deck`] - Main interface for deck operations
//! - [`DeckRepository`] - Data-access contract consumed by the scheduler
//! - [`Topic`], [`Card`], [`SrsRecord`], [`ImportPayload`] - Stored records
//! - [`DeckError`] - Operation error types
//!
//! # Example
//!
//! ```ignore
//! use flashdeck_core::{Database, Deck};
//! use std::path::Path;
//!
//! let db = Database::new(Path::new("flashdeck.db")).await?;
//! let deck = Deck::new(db);
//!
//! for topic in deck.list_topics().await? {
//!     let cards = deck.list_cards_by_topic(&topic.id).await?;
//!     println!("{} ({} cards)", topic.name, cards.len());
//! }
//! ```

mod error;
mod item;
mod repository;

pub use error::{DbErrorKind, DeckError};
pub use item::{Card, ImportPayload, SrsRecord, Timestamp, Topic, new_id};
pub use repository::DeckRepository;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};
use tracing::{debug, instrument};

use crate::db::Database;

/// Highest mastery level a record can reach.
pub const MAX_LEVEL: u8 = 10;

/// Result type for deck operations.
pub type Result<T> = std::result::Result<T, DeckError>;

const UPSERT_TOPIC_SQL: &str = r"INSERT INTO topics (id, name, description)
      VALUES (?, ?, ?)
      ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        description = excluded.description";

const UPSERT_CARD_SQL: &str = r"INSERT INTO cards (id, topic_id, question, answer)
      VALUES (?, ?, ?, ?)
      ON CONFLICT(id) DO UPDATE SET
        topic_id = excluded.topic_id,
        question = excluded.question,
        answer = excluded.answer";

/// Deck store for topics, cards and spaced-repetition records.
///
/// Every write replaces whole records, so a failed write never leaves a
/// partially updated card or mastery record behind.
#[derive(Debug, Clone)]
pub struct Deck {
    db: Database,
}

impl Deck {
    /// Creates a deck store over the given database connection.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Lists all topics sorted by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_topics(&self) -> Result<Vec<Topic>> {
        let mut topics =
            sqlx::query_as::<_, Topic>("SELECT id, name, description FROM topics")
                .fetch_all(self.db.pool())
                .await?;
        // SQLite's NOCASE only folds ASCII.
        topics.sort_by_cached_key(|topic| {
            (topic.name.to_lowercase(), topic.name.clone(), topic.id.clone())
        });
        Ok(topics)
    }

    /// Lists the cards of one topic in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_cards_by_topic(&self, topic_id: &str) -> Result<Vec<Card>> {
        let cards = sqlx::query_as::<_, Card>(
            r"SELECT id, topic_id, question, answer FROM cards
              WHERE topic_id = ?
              ORDER BY seq ASC",
        )
        .bind(topic_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(cards)
    }

    /// Retrieves a single card by id.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn get_card(&self, card_id: &str) -> Result<Option<Card>> {
        let card = sqlx::query_as::<_, Card>(
            "SELECT id, topic_id, question, answer FROM cards WHERE id = ?",
        )
        .bind(card_id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(card)
    }

    /// Inserts or replaces a card, keeping its original position in the topic.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if the write fails.
    #[instrument(skip(self, card), fields(card_id = %card.id))]
    pub async fn upsert_card(&self, card: &Card) -> Result<()> {
        sqlx::query(UPSERT_CARD_SQL)
            .bind(&card.id)
            .bind(&card.topic_id)
            .bind(&card.question)
            .bind(&card.answer)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Wipes all topics and cards. Mastery records are kept.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        let cards = sqlx::query("DELETE FROM cards").execute(&mut *tx).await?;
        let topics = sqlx::query("DELETE FROM topics").execute(&mut *tx).await?;
        tx.commit().await?;
        debug!(
            cards = cards.rows_affected(),
            topics = topics.rows_affected(),
            "Cleared deck"
        );
        Ok(())
    }

    /// Returns the mastery record for a card, if it was ever reviewed.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn get_srs_record(&self, card_id: &str) -> Result<Option<SrsRecord>> {
        let row = sqlx::query("SELECT card_id, level, next_due FROM srs_records WHERE card_id = ?")
            .bind(card_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.as_ref().map(srs_record_from_row))
    }

    /// Inserts or replaces the mastery record of a card.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if the write fails.
    #[instrument(skip(self, record), fields(card_id = %record.card_id, level = record.level))]
    pub async fn upsert_srs_record(&self, record: &SrsRecord) -> Result<()> {
        sqlx::query(
            r"INSERT INTO srs_records (card_id, level, next_due)
              VALUES (?, ?, ?)
              ON CONFLICT(card_id) DO UPDATE SET
                level = excluded.level,
                next_due = excluded.next_due",
        )
        .bind(&record.card_id)
        .bind(i64::from(record.level.min(MAX_LEVEL)))
        .bind(record.next_due)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Writes all topics, then all cards, in a single transaction.
    ///
    /// Records are upserted by id. On any failure nothing from the batch is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if any write fails.
    #[instrument(skip(self, payload), fields(topics = payload.topics.len(), cards = payload.cards.len()))]
    pub async fn bulk_import(&self, payload: &ImportPayload) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        write_payload(&mut tx, payload).await?;
        tx.commit().await?;
        debug!("Bulk import committed");
        Ok(())
    }

    /// Replaces all topics and cards with `payload` in a single transaction.
    ///
    /// Same as [`Deck::clear_all`] followed by [`Deck::bulk_import`], except
    /// that a failed import leaves the previous deck untouched. Mastery
    /// records are kept.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if any write fails.
    #[instrument(skip(self, payload), fields(topics = payload.topics.len(), cards = payload.cards.len()))]
    pub async fn replace_all(&self, payload: &ImportPayload) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        sqlx::query("DELETE FROM cards").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM topics").execute(&mut *tx).await?;
        write_payload(&mut tx, payload).await?;
        tx.commit().await?;
        debug!("Deck replaced");
        Ok(())
    }

    /// Reads every topic and card into one payload, in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Database`] if a query fails.
    #[instrument(skip(self))]
    pub async fn export_all(&self) -> Result<ImportPayload> {
        let topics = self.list_topics().await?;
        let cards = sqlx::query_as::<_, Card>(
            "SELECT id, topic_id, question, answer FROM cards ORDER BY seq ASC",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(ImportPayload { topics, cards })
    }

    /// Closes the underlying connection pool.
    pub async fn close(self) {
        self.db.close().await;
    }
}

async fn write_payload(tx: &mut Transaction<'_, Sqlite>, payload: &ImportPayload) -> Result<()> {
    for topic in &payload.topics {
        sqlx::query(UPSERT_TOPIC_SQL)
            .bind(&topic.id)
            .bind(&topic.name)
            .bind(topic.description.as_deref())
            .execute(&mut **tx)
            .await?;
    }

    for card in &payload.cards {
        sqlx::query(UPSERT_CARD_SQL)
            .bind(&card.id)
            .bind(&card.topic_id)
            .bind(&card.question)
            .bind(&card.answer)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

fn srs_record_from_row(row: &SqliteRow) -> SrsRecord {
    let level: i64 = row.get("level");
    SrsRecord {
        card_id: row.get("card_id"),
        level: u8::try_from(level.clamp(0, i64::from(MAX_LEVEL))).unwrap_or(MAX_LEVEL),
        next_due: row.get("next_due"),
    }
}
