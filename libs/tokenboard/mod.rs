//! Token Board
//!
//! Live 24h-ticker table for a fixed set of crypto tokens: a Binance
//! ticker client folds updates into a token book, and a terminal view
//! sorts, formats and flashes them.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

// Re-export commonly used items
pub use application::board::{App, TableView};
pub use domain::{
    sort_tokens, FlashDirection, FlashTracker, PriceFlash, PriceTick, SortConfig, SortDirection,
    SortKey, TickOutcome, Token, TokenBook,
};
pub use infrastructure::{
    init_tracing, init_tracing_to_file, BoardConfig, ConfigError, FeedError, FeedState,
    SharedFeedState, ShutdownManager, TickerFeed,
};
pub use utils::{format_currency, format_number, format_percentage, format_price};
