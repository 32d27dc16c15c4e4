//! Spaced-repetition scheduling.
//!
//! Each card's mastery is a level in `0..=10`. A correct answer raises the
//! level by one, a wrong answer drops it to zero, and the card comes due
//! again after `max(1, 2^level)` days.
//!
//! - [`next_record`] - Pure level/due-date transition for one review
//! - [`select_next`] - Picks the next card index, preferring overdue cards
//! - [`Scheduler`] - Persists review outcomes through a [`DeckRepository`]
//! - [`ReviewSession`] - One topic's cards plus their cached records

mod session;

pub use session::ReviewSession;

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, instrument};

use crate::deck::{Card, DeckRepository, MAX_LEVEL, Result, SrsRecord, Timestamp};

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Returns the current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// Review interval in days for a mastery level: `max(1, 2^level)`.
#[must_use]
pub fn interval_days(level: u8) -> i64 {
    (1_i64 << u32::from(level.min(MAX_LEVEL))).max(1)
}

/// Computes the record produced by one review at `now`.
///
/// A missing record starts at level 0, due now.
#[must_use]
pub fn next_record(
    existing: Option<&SrsRecord>,
    card_id: &str,
    was_correct: bool,
    now: Timestamp,
) -> SrsRecord {
    let current_level = existing.map_or(0, |record| record.level);
    let level = if was_correct {
        current_level.saturating_add(1).min(MAX_LEVEL)
    } else {
        0
    };

    SrsRecord {
        card_id: card_id.to_string(),
        level,
        next_due: now.saturating_add(interval_days(level) * MILLIS_PER_DAY),
    }
}

/// Selects the index of the next card to present.
///
/// The scan starts right after `current` (or at index 0 when `current` is
/// `None`) and wraps around once, so `current` itself is visited last. The
/// first card with no record or with `next_due <= now` wins. When nothing
/// is due, the card with the smallest `next_due` wins, ties going to the
/// first one scanned. An empty deck yields 0.
#[must_use]
pub fn select_next(
    cards: &[Card],
    current: Option<usize>,
    records: &HashMap<String, SrsRecord>,
    now: Timestamp,
) -> usize {
    let len = cards.len();
    if len == 0 {
        return 0;
    }

    let start = current.map_or(0, |index| (index % len) + 1);
    let mut soonest: Option<(Timestamp, usize)> = None;

    for step in 0..len {
        let index = (start + step) % len;
        let due = match records.get(&cards[index].id) {
            None => return index,
            Some(record) if record.is_due(now) => return index,
            Some(record) => record.next_due,
        };
        if soonest.is_none_or(|(best, _)| due < best) {
            soonest = Some((due, index));
        }
    }

    soonest.map_or(start % len, |(_, index)| index)
}

/// Applies review outcomes to persisted mastery records.
///
/// This is the only write path for [`SrsRecord`]s.
#[derive(Debug)]
pub struct Scheduler<'a, R: DeckRepository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: DeckRepository + ?Sized> Scheduler<'a, R> {
    /// Creates a scheduler writing through `repo`.
    #[must_use]
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Records one review of `card_id` at `now` and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DeckError`] if reading or writing the record fails.
    #[instrument(skip(self))]
    pub async fn record_review(
        &self,
        card_id: &str,
        was_correct: bool,
        now: Timestamp,
    ) -> Result<SrsRecord> {
        let existing = self.repo.get_srs_record(card_id).await?;
        let record = next_record(existing.as_ref(), card_id, was_correct, now);
        self.repo.upsert_srs_record(&record).await?;
        debug!(
            level = record.level,
            next_due = record.next_due,
            "Review recorded"
        );
        Ok(record)
    }
}
