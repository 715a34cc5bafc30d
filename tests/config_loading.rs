//! Integration test: Configuration loading
//!
//! Tests bin_common path resolution and BoardConfig loading from disk.

use std::env;
use std::io::Write;

use tempfile::{NamedTempFile, TempDir};
use tokenboard_app::bin_common::{load_board_config, load_config_from_env, ConfigType};
use tokenboard_app::tokenboard::{BoardConfig, ConfigError};

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_board_config_path() {
    env::remove_var("TOKENBOARD_CONFIG_PATH");
    let path = load_config_from_env(&ConfigType::Board);
    assert_eq!(path.to_str().unwrap(), "config/tokenboard.yaml");

    env::set_var("TOKENBOARD_CONFIG_PATH", "/tmp/board.yaml");
    let path = load_config_from_env(&ConfigType::Board);
    assert_eq!(path.to_str().unwrap(), "/tmp/board.yaml");
    env::remove_var("TOKENBOARD_CONFIG_PATH");
}

#[test]
fn test_load_custom_tokens() {
    let file = write_config(
        r#"
log_level: debug
tokens:
  - id: bitcoin
    name: Bitcoin
    symbol: BTC
    price: 60000.0
    change_24h: 1.0
    volume_24h: 1000000.0
    market_cap: 1000000000.0
  - id: solana
    name: Solana
    symbol: SOL
    price: 100.0
    change_24h: -2.0
    volume_24h: 5000.0
    market_cap: 40000000000.0
    logo_url: https://example.com/sol.png
"#,
    );

    let config = BoardConfig::load(file.path()).unwrap();
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.tokens.len(), 2);
    assert_eq!(config.tokens[0].logo_url, None);
    assert_eq!(
        config.tokens[1].logo_url.as_deref(),
        Some("https://example.com/sol.png")
    );
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yaml");

    let config = BoardConfig::load_or_default(&missing).unwrap();
    assert_eq!(config.tokens.len(), 8);

    // Strict load still reports the missing file
    assert!(matches!(
        BoardConfig::load(&missing),
        Err(ConfigError::FileError(_))
    ));
}

#[test]
fn test_invalid_yaml_and_values() {
    let file = write_config("tokens: [this is: not valid");
    assert!(matches!(
        BoardConfig::load(file.path()),
        Err(ConfigError::YamlError(_))
    ));

    let file = write_config(
        r#"
tokens:
  - { id: x, name: X, symbol: X, price: 1.0, change_24h: 0.0, volume_24h: -5.0, market_cap: 1.0 }
"#,
    );
    let err = load_board_config(&[file.path().to_string_lossy().into_owned()]).unwrap_err();
    assert!(format!("{:#}", err).contains("must not be negative"));
}

#[test]
fn test_ws_url_environment_override() {
    let file = write_config("feed:\n  ws_url: wss://example.com/ws\n");

    // Only valid URLs are set here: other tests in this binary load configs
    // concurrently and would see the variable.
    env::set_var("TOKENBOARD_WS_URL", "ws://127.0.0.1:9000/ws");
    let overridden = BoardConfig::load(file.path());
    env::remove_var("TOKENBOARD_WS_URL");

    assert_eq!(overridden.unwrap().feed.ws_url, "ws://127.0.0.1:9000/ws");
}
