//! Review command handler: the interactive terminal review loop.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use flashdeck_core::deck::Timestamp;
use flashdeck_core::srs::{ReviewSession, interval_days, now_millis};
use flashdeck_core::{Deck, DeckRepository};
use rand::Rng;
use tracing::debug;

use crate::cli::ReviewArgs;

/// Outcome of one review loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub reviewed: usize,
    pub correct: usize,
}

/// Reviews one topic (the first by name unless given) on stdin/stdout.
pub async fn run_review_command(deck: &Deck, args: &ReviewArgs) -> Result<()> {
    let topics = deck.list_topics().await.context("Failed to list topics")?;
    let topic = match args.topic_id.as_deref() {
        Some(topic_id) => match topics.iter().find(|topic| topic.id == topic_id) {
            Some(topic) => topic,
            None => bail!(
                "Unknown topic '{topic_id}'\n  Suggestion: Run `flashdeck topics` to list topic ids"
            ),
        },
        None => match topics.first() {
            Some(topic) => topic,
            None => {
                println!("No topics. Run `flashdeck import-url` or `flashdeck import-file` first.");
                return Ok(());
            }
        },
    };

    let now = now_millis();
    let mut session = ReviewSession::load(deck, &topic.id, now)
        .await
        .context("Failed to load review session")?;
    let mut rng = rand::thread_rng();
    if args.shuffle {
        session.shuffle(&mut rng, now);
    }

    println!(
        "{}: {} cards, {} due",
        topic.name,
        session.len(),
        session.due_count(now)
    );

    let stdin = std::io::stdin();
    let summary = run_review_loop(
        &mut session,
        &mut stdin.lock(),
        &mut std::io::stdout().lock(),
        &mut rng,
        now_millis,
    )
    .await?;

    println!(
        "Reviewed {} cards, {} correct.",
        summary.reviewed, summary.correct
    );
    Ok(())
}

/// Drives `session` from line-based `input` until quit or end of input.
///
/// Per card: Enter reveals the answer, then `y`/`n` records the review,
/// `e` edits the card, `s` reshuffles and `q` quits.
pub async fn run_review_loop<R, I, W, G>(
    session: &mut ReviewSession<'_, R>,
    input: &mut I,
    out: &mut W,
    rng: &mut G,
    clock: impl Fn() -> Timestamp,
) -> Result<ReviewSummary>
where
    R: DeckRepository + ?Sized,
    I: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut summary = ReviewSummary::default();

    loop {
        let Some(card) = session.current() else {
            writeln!(out, "No cards in this topic.")?;
            return Ok(summary);
        };
        let question = card.question.clone();
        let answer = card.answer.clone();
        let level = session
            .current_record()
            .map(|record| format!(" (level {})", record.level))
            .unwrap_or_default();

        writeln!(out)?;
        writeln!(
            out,
            "[{}/{}] {}{}",
            session.position() + 1,
            session.len(),
            question,
            level
        )?;
        prompt(out, "Enter to show the answer, q to quit> ")?;
        match read_line(input)?.as_deref() {
            None | Some("q") => return Ok(summary),
            Some(_) => {}
        }
        if answer.is_empty() {
            writeln!(out, "Answer: (none yet, press e to add one)")?;
        } else {
            writeln!(out, "Answer: {answer}")?;
        }

        loop {
            prompt(out, "Correct? [y]es [n]o [e]dit [s]huffle [q]uit> ")?;
            let Some(choice) = read_line(input)? else {
                return Ok(summary);
            };
            match choice.as_str() {
                "y" | "yes" | "n" | "no" => {
                    let was_correct = choice.starts_with('y');
                    if let Some(record) = session.answer(was_correct, clock()).await? {
                        summary.reviewed += 1;
                        if was_correct {
                            summary.correct += 1;
                        }
                        writeln!(
                            out,
                            "Level {}, next review in {} day(s)",
                            record.level,
                            interval_days(record.level)
                        )?;
                    }
                    break;
                }
                "e" | "edit" => {
                    prompt(out, "New question (Enter keeps it)> ")?;
                    let new_question = read_line(input)?.unwrap_or_default();
                    prompt(out, "New answer (Enter keeps it)> ")?;
                    let new_answer = read_line(input)?.unwrap_or_default();
                    let question = keep_if_blank(new_question, &question);
                    let answer = keep_if_blank(new_answer, &answer);
                    session.edit_current(&question, &answer).await?;
                    writeln!(out, "Saved.")?;
                }
                "s" | "shuffle" => {
                    session.shuffle(rng, clock());
                    writeln!(out, "Shuffled.")?;
                    break;
                }
                "q" | "quit" => return Ok(summary),
                other => writeln!(out, "Unknown choice '{other}'")?,
            }
        }
        debug!(?summary, "Review step done");
    }
}

fn prompt(out: &mut impl Write, text: &str) -> std::io::Result<()> {
    write!(out, "{text}")?;
    out.flush()
}

/// Reads one trimmed line; `None` at end of input.
fn read_line(input: &mut impl BufRead) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn keep_if_blank(new: String, current: &str) -> String {
    if new.is_empty() {
        current.to_string()
    } else {
        new
    }
}
