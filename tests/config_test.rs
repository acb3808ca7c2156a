//! Tests for config files and saved states on disk.

use mash::{AnyGame, GameConfig, Phase, run_headless};
use std::io::Write;

const CONFIG: &str = r#"
letters = "mash"
magic_number = 4
tick_millis = 80

[[categories]]
key = "spouse"
display_name = "Spouse"
options = ["Alex", "Sam", "Robin"]

[[categories]]
key = "city"
display_name = "City"
options = ["Paris", "Lima", "Oslo", "Kyoto"]
"#;

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Temp file");
    file.write_all(content.as_bytes()).expect("Write config");
    file
}

#[test]
fn test_load_config_from_file() {
    let file = config_file(CONFIG);
    let config = GameConfig::from_file(file.path()).expect("Valid config");
    assert_eq!(config.letters(), "mash");
    assert_eq!(*config.magic_number(), Some(4));
    assert_eq!(*config.tick_millis(), 80);
    assert_eq!(config.categories().len(), 2);
    assert_eq!(config.categories()[1].options().len(), 4);
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let config = GameConfig::load_or_default(&dir.path().join("absent.toml")).expect("Defaults");
    assert_eq!(config, GameConfig::default());
}

#[test]
fn test_bad_toml_is_an_error() {
    let file = config_file("letters = [");
    let err = GameConfig::from_file(file.path()).expect_err("Invalid TOML");
    assert!(err.message.contains("parse"));
}

#[test]
fn test_headless_run_from_config() {
    let file = config_file(CONFIG);
    let config = GameConfig::from_file(file.path()).expect("Valid config");
    let setup = config.to_setup(true).expect("Playable config");
    assert_eq!(setup.state().mash_letters().len(), 4);
    assert_eq!(setup.state().mash_letters()[0].letter(), 'M');

    let outcome = run_headless(setup).expect("Elimination converges");
    // 11 items, 3 survivors.
    assert_eq!(outcome.crossings.len(), 8);
    assert_eq!(outcome.results.fortune().picks().len(), 2);
}

#[test]
fn test_default_config_needs_options() {
    let err = GameConfig::default().to_setup(true).expect_err("Empty categories");
    assert!(err.message.contains("finish spouse"));
}

#[test]
fn test_saved_results_reload() {
    let file = config_file(CONFIG);
    let config = GameConfig::from_file(file.path()).expect("Valid config");
    let outcome = run_headless(config.to_setup(true).expect("Playable config")).expect("Converges");

    let dir = tempfile::tempdir().expect("Temp dir");
    let path = dir.path().join("state.json");
    let game = AnyGame::from(outcome.results);
    std::fs::write(&path, game.to_json_pretty().expect("Serializable")).expect("Write state");

    let json = std::fs::read_to_string(&path).expect("Read state");
    let loaded = AnyGame::from_json(&json).expect("Valid state");
    assert_eq!(loaded.phase(), Phase::Results);
    assert_eq!(loaded.state(), game.state());
}
