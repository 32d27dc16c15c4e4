//! Import command handlers: replace the deck from a page, add from a file.

use std::path::Path;

use anyhow::{Context, Result, bail};
use flashdeck_core::fetch::{FallbackFetcher, FetchSettings, PageFetcher};
use flashdeck_core::{AcquireStats, Acquirer, Deck, transfer};
use tracing::info;

/// Fetches `url` through the fallback routes and replaces the deck with it.
pub async fn run_import_url_command(deck: &Deck, fetch: FetchSettings, url: &str) -> Result<()> {
    let fetcher = FallbackFetcher::new(fetch).context("Failed to set up the page fetcher")?;
    let stats = replace_deck_from_url(deck, &Acquirer::new(fetcher), url).await?;

    println!(
        "Imported {} topics with {} cards from {url}",
        stats.topics, stats.cards
    );
    if stats.children_skipped > 0 {
        println!(
            "Skipped {} of {} child pages that could not be fetched",
            stats.children_skipped, stats.children_found
        );
    }
    Ok(())
}

/// Acquires `url` and swaps it in for the current deck.
///
/// The deck is only touched once the root page was fetched, and the swap
/// is a single transaction.
pub async fn replace_deck_from_url<F: PageFetcher>(
    deck: &Deck,
    acquirer: &Acquirer<F>,
    url: &str,
) -> Result<AcquireStats> {
    let Some((payload, stats)) = acquirer.acquire_with_stats(url).await else {
        bail!(
            "Could not fetch '{url}' directly or through either proxy; the deck was left unchanged\n  Suggestion: Check the URL and your network connection, then retry"
        );
    };

    deck.replace_all(&payload)
        .await
        .context("Failed to store the imported deck")?;
    info!(topics = stats.topics, cards = stats.cards, "Deck replaced");
    Ok(stats)
}

/// Adds (or updates by id) the topics and cards of a JSON file.
pub async fn run_import_file_command(deck: &Deck, path: &Path) -> Result<()> {
    let payload = transfer::read_payload(path)?;
    deck.bulk_import(&payload)
        .await
        .with_context(|| format!("Failed to import '{}'", path.display()))?;

    println!(
        "Imported {} topics and {} cards from {}",
        payload.topics.len(),
        payload.cards.len(),
        path.display()
    );
    Ok(())
}
