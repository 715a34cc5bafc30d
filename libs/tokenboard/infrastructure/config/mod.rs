use crate::domain::token::{default_tokens, Token};
use crate::infrastructure::client::binance::BinanceAsset;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "TOKENBOARD_CONFIG_PATH";

/// Used when `TOKENBOARD_CONFIG_PATH` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/tokenboard.yaml";

/// Overrides `feed.ws_url` when set.
pub const WS_URL_ENV: &str = "TOKENBOARD_WS_URL";

pub const DEFAULT_WS_URL: &str = "wss://stream.binance.com:9443/ws";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Token board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub feed: FeedConfig,

    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log file for the terminal UI
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Seed tokens, in display order before the first sort
    #[serde(default = "default_tokens")]
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            log_level: default_log_level(),
            log_file: default_log_file(),
            tokens: default_tokens(),
        }
    }
}

fn default_ws_url() -> String {
    DEFAULT_WS_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "tokenboard.log".to_string()
}

impl BoardConfig {
    /// Load configuration from YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&yaml_content)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults
    /// (still subject to environment overrides and validation).
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        info!("No config at {}, using defaults", path.display());
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut config: BoardConfig = serde_yaml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(WS_URL_ENV) {
            info!("Overriding feed URL from environment variable");
            self.feed.ws_url = url;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = &self.feed.ws_url;
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::ValidationError(format!(
                "feed.ws_url must start with ws:// or wss://, got '{}'",
                url
            )));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        if self.tokens.is_empty() {
            return Err(ConfigError::ValidationError(
                "tokens must not be empty".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        for token in &self.tokens {
            if !ids.insert(token.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate token id '{}'",
                    token.id
                )));
            }
            if !token.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "token '{}' has non-finite values",
                    token.id
                )));
            }
            if token.price <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "token '{}' price must be greater than 0",
                    token.id
                )));
            }
            if token.volume_24h < 0.0 || token.market_cap < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "token '{}' volume and market cap must not be negative",
                    token.id
                )));
            }
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Feed URL: {}", self.feed.ws_url);
        info!("  Log level: {}", self.log_level);
        info!("  Tokens: {}", self.tokens.len());

        let unmapped: Vec<&str> = self
            .tokens
            .iter()
            .filter(|t| BinanceAsset::from_token_id(&t.id).is_none())
            .map(|t| t.id.as_str())
            .collect();
        if !unmapped.is_empty() {
            warn!(
                "  No ticker stream for: {} (prices stay at seed values)",
                unmapped.join(", ")
            );
        }
    }
}
