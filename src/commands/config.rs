//! Config command handlers: show effective configuration.

use crate::app_config::{LoadedConfig, Settings};

pub fn run_config_show_command(settings: &Settings, loaded_config: &LoadedConfig) {
    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("database_path = {}", settings.database_path.display());
    println!("source_url = {}", settings.source_url);
    println!(
        "connect_timeout_secs = {}",
        settings.fetch.connect_timeout_secs
    );
    println!("read_timeout_secs = {}", settings.fetch.read_timeout_secs);
    println!("text_proxy_base = {}", settings.fetch.text_proxy_base);
    println!(
        "passthrough_proxy_base = {}",
        settings.fetch.passthrough_proxy_base
    );
    println!("verbosity = {}", settings.verbosity.as_str());
}
