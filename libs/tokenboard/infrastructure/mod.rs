pub mod client;
pub mod config;
pub mod logging;
pub mod shutdown;

pub use client::binance::{FeedError, FeedState, SharedFeedState, TickerFeed};
pub use config::{BoardConfig, ConfigError, FeedConfig};
pub use logging::{init_tracing, init_tracing_to_file};
pub use shutdown::ShutdownManager;
