//! End-to-end CLI tests for the flashdeck binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

const DECK_JSON: &str = r#"{
  "topics": [
    {"id": "t-limits", "name": "Limits", "description": "Imported from Notion"},
    {"id": "t-calc", "name": "calculus"}
  ],
  "cards": [
    {"id": "c1", "topic_id": "t-limits", "question": "Define a limit.", "answer": "epsilon-delta"},
    {"id": "c2", "topic_id": "t-limits", "question": "One-sided limits?"},
    {"id": "c3", "topic_id": "t-calc", "question": "What is calculus?"}
  ]
}"#;

/// Command isolated from the user's config and data directories.
fn flashdeck(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("flashdeck").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("HOME", home.path())
        .env_remove("RUST_LOG")
        .arg("--db")
        .arg(home.path().join("deck.db"));
    cmd
}

fn write_deck_file(dir: &Path) -> std::path::PathBuf {
    let file = dir.join("deck.json");
    std::fs::write(&file, DECK_JSON).unwrap();
    file
}

fn imported_home() -> TempDir {
    let home = tempfile::tempdir().unwrap();
    let file = write_deck_file(home.path());
    flashdeck(&home)
        .arg("import-file")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 topics and 3 cards"));
    home
}

#[test]
fn test_binary_help_displays_usage() {
    Command::cargo_bin("flashdeck")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import-url"))
        .stdout(predicate::str::contains("review"));
}

#[test]
fn test_binary_version_displays_version() {
    Command::cargo_bin("flashdeck")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flashdeck"));
}

#[test]
fn test_binary_without_subcommand_fails() {
    Command::cargo_bin("flashdeck")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_topics_listed_by_name_case_insensitively() {
    let home = imported_home();

    flashdeck(&home)
        .arg("topics")
        .assert()
        .success()
        .stdout("t-calc\tcalculus\nt-limits\tLimits\n");
}

#[test]
fn test_cards_listed_in_import_order() {
    let home = imported_home();

    flashdeck(&home)
        .args(["cards", "t-limits"])
        .assert()
        .success()
        .stdout("c1\tDefine a limit.\tepsilon-delta\nc2\tOne-sided limits?\t\n");
}

#[test]
fn test_empty_deck_topics_hint() {
    let home = tempfile::tempdir().unwrap();

    flashdeck(&home)
        .arg("topics")
        .assert()
        .success()
        .stdout(predicate::str::contains("No topics"));
}

#[test]
fn test_edit_then_export() {
    let home = imported_home();

    flashdeck(&home)
        .args(["edit", "c2", "--answer", "Left and right"])
        .assert()
        .success();

    let out = home.path().join("out.json");
    flashdeck(&home).arg("export").arg(&out).assert().success();

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(exported["topics"].as_array().unwrap().len(), 2);
    assert_eq!(exported["cards"][1]["answer"], "Left and right");
    assert!(exported["topics"][0].get("description").is_none());
}

#[test]
fn test_edit_unknown_card_fails() {
    let home = imported_home();

    flashdeck(&home)
        .args(["edit", "nope", "--question", "Q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("card not found"));
}

#[test]
fn test_import_malformed_file_fails() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("bad.json");
    std::fs::write(&file, "{ not json").unwrap();

    flashdeck(&home)
        .arg("import-file")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid import file"));
}

#[test]
fn test_review_records_answer() {
    let home = imported_home();

    flashdeck(&home)
        .args(["review", "t-limits"])
        .write_stdin("\ny\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Limits: 2 cards, 2 due"))
        .stdout(predicate::str::contains("[1/2] Define a limit."))
        .stdout(predicate::str::contains("Answer: epsilon-delta"))
        .stdout(predicate::str::contains("Level 1, next review in 2 day(s)"))
        .stdout(predicate::str::contains("Reviewed 1 cards, 1 correct."));

    flashdeck(&home)
        .args(["review", "t-limits"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Limits: 2 cards, 1 due"))
        .stdout(predicate::str::contains("[2/2] One-sided limits?"));
}

#[test]
fn test_review_unknown_topic_fails() {
    let home = imported_home();

    flashdeck(&home)
        .args(["review", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown topic"));
}

#[test]
fn test_config_show_reads_config_file() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join("config").join("flashdeck");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "read_timeout_secs = 12\nverbosity = \"quiet\"\n",
    )
    .unwrap();

    flashdeck(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains("read_timeout_secs = 12"))
        .stdout(predicate::str::contains("verbosity = quiet"));
}

#[test]
fn test_invalid_config_file_fails() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join("config").join("flashdeck");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "connect_timeout_secs = 0\n").unwrap();

    flashdeck(&home)
        .arg("topics")
        .assert()
        .failure()
        .stderr(predicate::str::contains("connect_timeout_secs"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_url_replaces_deck() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Integrals</title></head><body><p>Define an integral.</p></body></html>",
        ))
        .mount(&server)
        .await;
    let home = imported_home();
    let url = format!("{}/page", server.uri());

    flashdeck(&home)
        .args(["import-url", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 topics with 1 cards"));

    flashdeck(&home)
        .arg("topics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Integrals"))
        .stdout(predicate::str::contains("Limits").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_url_failure_keeps_deck() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let home = imported_home();
    let config_dir = home.path().join("config").join("flashdeck");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "text_proxy_base = \"{0}/tp\"\npassthrough_proxy_base = \"{0}/pt\"\n",
            server.uri()
        ),
    )
    .unwrap();

    flashdeck(&home)
        .args(["import-url", &format!("{}/page", server.uri())])
        .assert()
        .failure()
        .stderr(predicate::str::contains("left unchanged"));

    flashdeck(&home)
        .arg("topics")
        .assert()
        .success()
        .stdout(predicate::str::contains("Limits"));
}
