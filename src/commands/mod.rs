//! CLI command handlers.

mod config;
mod deck;
mod import;
mod review;

pub use config::run_config_show_command;
pub use deck::{run_cards_command, run_edit_command, run_export_command, run_topics_command};
pub use import::{run_import_file_command, run_import_url_command};
pub use review::run_review_command;

use std::path::Path;

use anyhow::{Context, Result};
use flashdeck_core::{Database, Deck};
use tracing::debug;

use crate::app_config::{LoadedConfig, Settings};
use crate::cli::{Command, ConfigCommand};

/// Opens the deck database at `path`.
pub async fn open_deck(path: &Path) -> Result<Deck> {
    let db = Database::new(path)
        .await
        .with_context(|| format!("Failed to open deck database '{}'", path.display()))?;
    debug!(path = %path.display(), "Deck database opened");
    Ok(Deck::new(db))
}

/// Runs `command` against the configured deck.
pub async fn dispatch(command: &Command, settings: &Settings, loaded: &LoadedConfig) -> Result<()> {
    if let Command::Config {
        command: ConfigCommand::Show,
    } = command
    {
        run_config_show_command(settings, loaded);
        return Ok(());
    }

    let deck = open_deck(&settings.database_path).await?;
    let result = run_deck_command(&deck, command, settings).await;
    deck.close().await;
    result
}

async fn run_deck_command(deck: &Deck, command: &Command, settings: &Settings) -> Result<()> {
    match command {
        Command::ImportUrl(args) => {
            let url = args.url.as_deref().unwrap_or(&settings.source_url);
            let mut fetch = settings.fetch.clone();
            if let Some(secs) = args.connect_timeout {
                fetch.connect_timeout_secs = secs;
            }
            if let Some(secs) = args.read_timeout {
                fetch.read_timeout_secs = secs;
            }
            run_import_url_command(deck, fetch, url).await
        }
        Command::Reset => {
            run_import_url_command(deck, settings.fetch.clone(), &settings.source_url).await
        }
        Command::ImportFile { path } => run_import_file_command(deck, path).await,
        Command::Export { path } => run_export_command(deck, path).await,
        Command::Topics => run_topics_command(deck).await,
        Command::Cards { topic_id } => run_cards_command(deck, topic_id).await,
        Command::Edit(args) => run_edit_command(deck, args).await,
        Command::Review(args) => run_review_command(deck, args).await,
        Command::Config { .. } => Ok(()),
    }
}
