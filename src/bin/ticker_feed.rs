//! Headless ticker feed
//!
//! Connects to the Binance ticker stream and logs the token table every few
//! seconds. Useful for checking the feed without the terminal UI.

use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use tokenboard_app::bin_common::{load_board_config, parse_args, BinaryRunner, RunConfig};
use tokenboard_app::tokenboard::utils::{format_currency, format_percentage, format_price};
use tokenboard_app::tokenboard::{
    init_tracing, sort_tokens, ShutdownManager, SortConfig, TickerFeed,
};

struct FeedLogger {
    config: RunConfig,
    shutdown: ShutdownManager,
    feed: TickerFeed,
    last_revision: u64,
}

impl BinaryRunner for FeedLogger {
    fn config(&self) -> &RunConfig {
        &self.config
    }

    fn shutdown_manager(&self) -> &ShutdownManager {
        &self.shutdown
    }

    fn report(&mut self) {
        let state = self.feed.state();
        let guard = state.read();

        let revision = guard.revision();
        info!(
            "[Feed] state={} updates={} (+{})",
            guard.connection_state(),
            revision,
            revision - self.last_revision
        );
        self.last_revision = revision;

        if let Some(error) = guard.last_error() {
            warn!("[Feed] last error: {}", error);
            if error.is_terminal() {
                self.shutdown.trigger();
            }
        }

        for token in sort_tokens(&guard.tokens(), SortConfig::default()) {
            info!(
                "  {:<6} {:>14} {:>8} vol {:>10} cap {:>10}",
                token.symbol,
                format_price(token.price),
                format_percentage(token.change_24h, 2),
                format_currency(token.volume_24h, 2),
                format_currency(token.market_cap, 2),
            );
        }
    }

    async fn finish(&mut self) -> Option<String> {
        self.feed.shutdown().await;
        let metrics = self.feed.metrics();
        Some(format!(
            "Frames received: {}, reconnects: {}",
            metrics.messages_received, metrics.reconnect_count
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = load_board_config(&parse_args())?;
    init_tracing(&config.log_level);
    config.log();

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let feed = TickerFeed::spawn(&config).await?;

    let mut runner = FeedLogger {
        config: RunConfig::new("Ticker Feed").with_status_interval(Duration::from_secs(5)),
        shutdown,
        feed,
        last_revision: 0,
    };

    runner.execute().await
}
