//! Deck command handlers: list, edit and export.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use flashdeck_core::{Card, Deck, DeckError, Topic, transfer};

use crate::cli::EditArgs;

/// Writes every topic and card to `path` as JSON.
pub async fn run_export_command(deck: &Deck, path: &Path) -> Result<()> {
    let payload = deck.export_all().await.context("Failed to read the deck")?;
    transfer::write_payload(path, &payload)?;
    println!(
        "Exported {} topics and {} cards to {}",
        payload.topics.len(),
        payload.cards.len(),
        path.display()
    );
    Ok(())
}

/// Prints one `id<TAB>name` line per topic.
pub async fn run_topics_command(deck: &Deck) -> Result<()> {
    let topics = deck.list_topics().await.context("Failed to list topics")?;
    if topics.is_empty() {
        println!("No topics. Run `flashdeck import-url` or `flashdeck import-file` first.");
        return Ok(());
    }
    write_topics(&mut std::io::stdout().lock(), &topics)?;
    Ok(())
}

/// Prints one `id<TAB>question<TAB>answer` line per card of a topic.
pub async fn run_cards_command(deck: &Deck, topic_id: &str) -> Result<()> {
    let cards = deck
        .list_cards_by_topic(topic_id)
        .await
        .with_context(|| format!("Failed to list cards of topic '{topic_id}'"))?;
    if cards.is_empty() {
        println!("No cards in topic '{topic_id}'.");
        return Ok(());
    }
    write_cards(&mut std::io::stdout().lock(), &cards)?;
    Ok(())
}

/// Updates the question and/or answer of one card.
pub async fn run_edit_command(deck: &Deck, args: &EditArgs) -> Result<()> {
    let card = deck
        .get_card(&args.card_id)
        .await
        .context("Failed to read card")?
        .ok_or_else(|| DeckError::CardNotFound(args.card_id.clone()))?;

    let edited = apply_edit(card, args);
    deck.upsert_card(&edited)
        .await
        .context("Failed to save card")?;
    println!("Updated card {}", edited.id);
    Ok(())
}

fn apply_edit(card: Card, args: &EditArgs) -> Card {
    Card {
        question: args.question.clone().unwrap_or(card.question),
        answer: args.answer.clone().unwrap_or(card.answer),
        ..card
    }
}

fn write_topics(out: &mut impl Write, topics: &[Topic]) -> std::io::Result<()> {
    for topic in topics {
        writeln!(out, "{}\t{}", topic.id, single_line(&topic.name))?;
    }
    Ok(())
}

fn write_cards(out: &mut impl Write, cards: &[Card]) -> std::io::Result<()> {
    for card in cards {
        writeln!(
            out,
            "{}\t{}\t{}",
            card.id,
            single_line(&card.question),
            single_line(&card.answer)
        )?;
    }
    Ok(())
}

/// Keeps listings one record per line.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
