//! Binance 24h Ticker Module
//!
//! Live price, change and volume for the board's tokens from Binance's public
//! WebSocket ticker streams.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tokenboard::infrastructure::{BoardConfig, TickerFeed};
//!
//! let config = BoardConfig::default();
//! let mut feed = TickerFeed::spawn(&config).await?;
//!
//! // Read the latest tokens from shared state
//! let state = feed.state();
//! for token in state.read().tokens() {
//!     println!("{}: ${}", token.symbol, token.price);
//! }
//!
//! feed.shutdown().await;
//! ```

mod feed_state;
mod types;
mod websocket;

// Re-export main types and functions
pub use feed_state::{FeedError, FeedState, SharedFeedState};
pub use types::{subscribe_message, BinanceAsset, BinanceMessage, BinanceTickerEvent, TICKER_EVENT};
pub use websocket::{
    default_backoff, BinanceRouter, FeedHandler, FeedStateHandler, TickerFeed,
    MAX_RECONNECT_ATTEMPTS, RECONNECT_BASE_DELAY, RECONNECT_MAX_DELAY,
};
