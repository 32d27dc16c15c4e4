//! CLI entry point for the flashdeck tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;
mod terminal;

use app_config::{Settings, default_log_level, load_default_file_config};
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let loaded_config = load_default_file_config()?;
    let settings = Settings::resolve(&cli, loaded_config.config.as_ref());

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > info
    let default_level = default_log_level(cli.verbose, cli.quiet, settings.verbosity);
    terminal::init_tracing(default_level, terminal::should_disable_color());

    debug!(?cli, "CLI arguments parsed");
    debug!(
        config = ?loaded_config.path,
        loaded = loaded_config.loaded_from_file,
        database = %settings.database_path.display(),
        "Configuration resolved"
    );

    commands::dispatch(&cli.command, &settings, &loaded_config).await
}
