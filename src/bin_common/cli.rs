//! CLI utilities for binaries
//!
//! Resolves the config file path from the environment and loads the board
//! configuration.

use std::path::PathBuf;

use anyhow::Context;
use tokenboard::infrastructure::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use tokenboard::BoardConfig;

/// Which configuration file to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Board configuration (config/tokenboard.yaml)
    Board,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Board => DEFAULT_CONFIG_PATH,
            ConfigType::Custom(path) => path,
        }
    }

    /// Environment variable that overrides the path, if any
    pub fn env_var_name(&self) -> Option<&str> {
        match self {
            ConfigType::Board => Some(CONFIG_PATH_ENV),
            ConfigType::Custom(_) => None,
        }
    }
}

/// Config path from the environment, or the default for `config_type`
pub fn load_config_from_env(config_type: &ConfigType) -> PathBuf {
    config_type
        .env_var_name()
        .and_then(|name| std::env::var(name).ok())
        .unwrap_or_else(|| config_type.default_path().to_string())
        .into()
}

/// Load the board config; a missing file means built-in defaults.
///
/// A first positional argument overrides the path.
pub fn load_board_config(args: &[String]) -> anyhow::Result<BoardConfig> {
    let config_type = match args.first() {
        Some(path) => ConfigType::Custom(path.clone()),
        None => ConfigType::Board,
    };
    let path = load_config_from_env(&config_type);

    BoardConfig::load_or_default(&path)
        .with_context(|| format!("loading config from {}", path.display()))
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_type_paths() {
        assert_eq!(ConfigType::Board.default_path(), "config/tokenboard.yaml");

        let custom = ConfigType::Custom("custom/path.yaml".to_string());
        assert_eq!(custom.default_path(), "custom/path.yaml");
        assert_eq!(custom.env_var_name(), None);
    }

    #[test]
    fn test_custom_path_ignores_environment() {
        let custom = ConfigType::Custom("elsewhere.yaml".to_string());
        assert_eq!(
            load_config_from_env(&custom),
            PathBuf::from("elsewhere.yaml")
        );
    }
}
