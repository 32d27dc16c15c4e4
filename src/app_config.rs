//! Application configuration loading for CLI defaults.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use flashdeck_core::fetch::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PASSTHROUGH_PROXY_BASE, DEFAULT_READ_TIMEOUT_SECS,
    DEFAULT_TEXT_PROXY_BASE, FetchSettings,
};

use crate::cli::Cli;

const APP_DIR: &str = "flashdeck";
const DATABASE_FILE: &str = "deck.db";

/// Page imported by `reset` and by `import-url` without an argument.
pub const DEFAULT_SOURCE_URL: &str =
    "https://pollen-jewel-bec.notion.site/1-c-8ec04abc8dba4cebbad42125cde3dba9";

/// File configuration for flashdeck defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Deck database location.
    pub database_path: Option<PathBuf>,
    /// Page imported by `reset` and bare `import-url`.
    pub source_url: Option<String>,
    /// Fetch connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Fetch whole-request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Text-extraction proxy base URL.
    pub text_proxy_base: Option<String>,
    /// Raw pass-through proxy base URL.
    pub passthrough_proxy_base: Option<String>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        validate_http_url("source_url", self.source_url.as_deref())?;
        validate_http_url("text_proxy_base", self.text_proxy_base.as_deref())?;
        validate_http_url(
            "passthrough_proxy_base",
            self.passthrough_proxy_base.as_deref(),
        )?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

fn validate_http_url(field: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let is_http = url::Url::parse(value)
        .is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host());
    if !is_http {
        bail!("Invalid config value for `{field}`: '{value}'. Expected an http(s) URL");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Log level used when neither `-v` nor `-q` is given.
    #[must_use]
    pub fn default_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/flashdeck/config.toml`
/// 2. `$HOME/.config/flashdeck/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(APP_DIR)
                .join("config.toml"),
        );
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.toml"),
    )
}

/// Resolves the default deck database path.
///
/// Priority:
/// 1. `$XDG_DATA_HOME/flashdeck/deck.db`
/// 2. `$HOME/.local/share/flashdeck/deck.db`
/// 3. `./deck.db`
#[must_use]
pub fn resolve_default_database_path() -> PathBuf {
    database_path_from(
        env_var_non_empty_os("XDG_DATA_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn database_path_from(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    if let Some(xdg_data_home) = xdg_data_home {
        return PathBuf::from(xdg_data_home)
            .join(APP_DIR)
            .join(DATABASE_FILE);
    }
    match home {
        Some(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR)
            .join(DATABASE_FILE),
        None => PathBuf::from(DATABASE_FILE),
    }
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "database_path" => {
                cfg.database_path = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "source_url" => {
                cfg.source_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "text_proxy_base" => {
                cfg.text_proxy_base = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "passthrough_proxy_base" => {
                cfg.passthrough_proxy_base =
                    Some(parse_string_literal(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

/// Effective settings after merging CLI flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_path: PathBuf,
    pub source_url: String,
    pub fetch: FetchSettings,
    pub verbosity: VerbositySetting,
}

impl Settings {
    /// Merges `cli` over `file_config` over built-in defaults.
    #[must_use]
    pub fn resolve(cli: &Cli, file_config: Option<&FileConfig>) -> Self {
        let file = file_config.cloned().unwrap_or_default();
        Self {
            database_path: cli
                .db
                .clone()
                .or(file.database_path)
                .unwrap_or_else(resolve_default_database_path),
            source_url: file
                .source_url
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            fetch: FetchSettings {
                connect_timeout_secs: file
                    .connect_timeout_secs
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
                read_timeout_secs: file.read_timeout_secs.unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
                text_proxy_base: file
                    .text_proxy_base
                    .unwrap_or_else(|| DEFAULT_TEXT_PROXY_BASE.to_string()),
                passthrough_proxy_base: file
                    .passthrough_proxy_base
                    .unwrap_or_else(|| DEFAULT_PASSTHROUGH_PROXY_BASE.to_string()),
            },
            verbosity: file.verbosity.unwrap_or(VerbositySetting::Default),
        }
    }
}

/// Log level for the subscriber when `RUST_LOG` is unset.
///
/// Priority: quiet flag > verbose flag > config verbosity > info.
#[must_use]
pub fn default_log_level(verbose: u8, quiet: bool, setting: VerbositySetting) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => setting.default_level(),
        1 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
read_timeout_secs = 45
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.read_timeout_secs, Some(45));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.database_path.is_none());
    }

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
database_path = "/tmp/cards.db"
source_url = "https://team.notion.site/Index-0123456789abcdef0123456789abcdef"
connect_timeout_secs = 5
read_timeout_secs = 60
text_proxy_base = "http://127.0.0.1:9000"
passthrough_proxy_base = "https://proxy.example"
verbosity = "quiet"
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.database_path, Some(PathBuf::from("/tmp/cards.db")));
        assert_eq!(cfg.connect_timeout_secs, Some(5));
        assert_eq!(
            cfg.text_proxy_base.as_deref(),
            Some("http://127.0.0.1:9000")
        );
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Quiet));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
# deck location
database_path = "/data/#1/deck.db" # hash inside quotes is kept
connect_timeout_secs = 4 # seconds
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.database_path, Some(PathBuf::from("/data/#1/deck.db")));
        assert_eq!(cfg.connect_timeout_secs, Some(4));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout_value() {
        let err = parse_config_str("connect_timeout_secs = 0").expect_err("invalid timeout");
        assert!(err.to_string().contains("connect_timeout_secs"));

        let err = parse_config_str("read_timeout_secs = 3601").expect_err("invalid timeout");
        assert!(err.to_string().contains("read_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err = parse_config_str("read_timeout_secs = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(format!("{err:#}").contains("read_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_non_http_proxy_base() {
        let err = parse_config_str(r#"text_proxy_base = "ftp://proxy.example""#)
            .expect_err("non-http base rejected");
        assert!(err.to_string().contains("text_proxy_base"));

        let err = parse_config_str(r#"source_url = "not a url""#).expect_err("bad url rejected");
        assert!(err.to_string().contains("source_url"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("database_path = /tmp/deck.db").expect_err("quotes required");
        assert!(format!("{err:#}").contains("double-quoted"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_verbosity() {
        let err = parse_config_str(r#"verbosity = "loud""#).expect_err("invalid verbosity");
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("\nverbosity\n").expect_err("syntax error expected");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_file_config_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "read_timeout_secs = 12\n").unwrap();

        let cfg = load_file_config(&path).unwrap();
        assert_eq!(cfg.read_timeout_secs, Some(12));
    }

    #[test]
    fn test_config_path_prefers_xdg() {
        assert_eq!(
            config_path_from(Some("/xdg".into()), Some("/home/u".into())),
            Some(PathBuf::from("/xdg/flashdeck/config.toml"))
        );
        assert_eq!(
            config_path_from(None, Some("/home/u".into())),
            Some(PathBuf::from("/home/u/.config/flashdeck/config.toml"))
        );
        assert_eq!(config_path_from(None, None), None);
    }

    #[test]
    fn test_database_path_fallbacks() {
        assert_eq!(
            database_path_from(Some("/data".into()), Some("/home/u".into())),
            PathBuf::from("/data/flashdeck/deck.db")
        );
        assert_eq!(
            database_path_from(None, Some("/home/u".into())),
            PathBuf::from("/home/u/.local/share/flashdeck/deck.db")
        );
        assert_eq!(database_path_from(None, None), PathBuf::from("deck.db"));
    }

    #[test]
    fn test_settings_cli_db_overrides_file() {
        let cli = Cli::parse_from(["flashdeck", "--db", "/cli.db", "topics"]);
        let file = FileConfig {
            database_path: Some(PathBuf::from("/file.db")),
            read_timeout_secs: Some(7),
            ..FileConfig::default()
        };

        let settings = Settings::resolve(&cli, Some(&file));

        assert_eq!(settings.database_path, PathBuf::from("/cli.db"));
        assert_eq!(settings.fetch.read_timeout_secs, 7);
        assert_eq!(settings.fetch.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(settings.source_url, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn test_settings_use_file_values() {
        let cli = Cli::parse_from(["flashdeck", "topics"]);
        let file = FileConfig {
            database_path: Some(PathBuf::from("/file.db")),
            source_url: Some("https://x.notion.site/p".to_string()),
            verbosity: Some(VerbositySetting::Debug),
            ..FileConfig::default()
        };

        let settings = Settings::resolve(&cli, Some(&file));

        assert_eq!(settings.database_path, PathBuf::from("/file.db"));
        assert_eq!(settings.source_url, "https://x.notion.site/p");
        assert_eq!(settings.verbosity, VerbositySetting::Debug);
        assert_eq!(settings.fetch.text_proxy_base, DEFAULT_TEXT_PROXY_BASE);
    }

    #[test]
    fn test_default_log_level_priority() {
        assert_eq!(default_log_level(0, false, VerbositySetting::Default), "info");
        assert_eq!(default_log_level(0, false, VerbositySetting::Quiet), "error");
        assert_eq!(default_log_level(1, false, VerbositySetting::Quiet), "debug");
        assert_eq!(default_log_level(2, false, VerbositySetting::Default), "trace");
        assert_eq!(default_log_level(2, true, VerbositySetting::Debug), "error");
    }

    #[test]
    fn test_verbosity_as_str() {
        assert_eq!(VerbositySetting::Default.as_str(), "default");
        assert_eq!(VerbositySetting::Verbose.as_str(), "verbose");
        assert_eq!(VerbositySetting::Quiet.as_str(), "quiet");
        assert_eq!(VerbositySetting::Debug.as_str(), "debug");
    }
}
