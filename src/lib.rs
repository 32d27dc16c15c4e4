//! Flashdeck Core Library
//!
//! Turns public wiki page trees into flashcard decks and schedules their
//! review with a doubling-interval spaced-repetition scheme.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fetch`] - Page retrieval with direct and proxy fallback routes
//! - [`page`] - HTML/plain-text extraction and child link discovery
//! - [`acquire`] - Root page (and children) to an import payload
//! - [`deck`] - Topic, card and mastery persistence
//! - [`srs`] - Review scheduling and review sessions
//! - [`transfer`] - JSON import/export files
//! - [`db`] - Database connection and schema management

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod acquire;
pub mod db;
pub mod deck;
pub mod fetch;
pub mod page;
pub mod srs;
pub mod transfer;
mod user_agent;

// Re-export commonly used types
pub use acquire::{AcquireStats, Acquirer};
pub use db::{Database, DbError};
pub use deck::{
    Card, DbErrorKind, Deck, DeckError, DeckRepository, ImportPayload, SrsRecord, Timestamp, Topic,
};
pub use fetch::{FallbackFetcher, FetchError, FetchRoute, FetchSettings, PageFetcher};
pub use srs::{ReviewSession, Scheduler, next_record, select_next};
pub use transfer::TransferError;
