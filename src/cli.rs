//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Turn public wiki pages into flashcards and review them.
///
/// Flashdeck imports a Notion-style page tree (each child page becomes a
/// topic, each text block a card) and schedules reviews with doubling
/// intervals.
#[derive(Parser, Debug)]
#[command(name = "flashdeck")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Deck database file (overrides config `database_path`)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the deck with topics fetched from a public page
    ImportUrl(ImportUrlArgs),
    /// Add topics and cards from a JSON file
    ImportFile {
        /// JSON file with "topics" and "cards" arrays
        path: PathBuf,
    },
    /// Write all topics and cards to a JSON file
    Export {
        /// Destination file (overwritten)
        path: PathBuf,
    },
    /// List topics
    Topics,
    /// List the cards of a topic
    Cards {
        /// Topic id
        topic_id: String,
    },
    /// Change a card's question and/or answer
    Edit(EditArgs),
    /// Clear the deck and re-import the default source page
    Reset,
    /// Review a topic interactively
    Review(ReviewArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `import-url`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ImportUrlArgs {
    /// Page URL (defaults to config `source_url`)
    pub url: Option<String>,

    /// Connect timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Whole-request timeout in seconds (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: Option<u64>,
}

/// Arguments for `edit`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[command(group(clap::ArgGroup::new("change").required(true).multiple(true).args(["question", "answer"])))]
pub struct EditArgs {
    /// Card id
    pub card_id: String,

    /// New question text
    #[arg(long)]
    pub question: Option<String>,

    /// New answer text
    #[arg(long)]
    pub answer: Option<String>,
}

/// Arguments for `review`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ReviewArgs {
    /// Topic id (defaults to the first topic by name)
    pub topic_id: Option<String>,

    /// Shuffle the cards before starting
    #[arg(long)]
    pub shuffle: bool,
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}
