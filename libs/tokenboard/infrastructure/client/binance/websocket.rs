//! Binance 24h ticker client
//!
//! Connects to the raw `/ws` endpoint, subscribes to one `@ticker` stream per
//! supported asset and folds every ticker event into the shared
//! [`FeedState`]. Parsing, symbol mapping and folding all run on the
//! hypersockets I/O task, one frame at a time.

use super::feed_state::{FeedState, SharedFeedState};
use super::types::{subscribe_message, BinanceMessage, BinanceTickerEvent, TICKER_EVENT};
use crate::domain::{TickOutcome, Token};
use crate::infrastructure::config::BoardConfig;
use anyhow::Result;
use hypersockets::{
    ClientEvent, ExponentialBackoff, HyperSocketError, MessageHandler, MessageRouter, Metrics,
    ReconnectionStrategy, StateHandler, WebSocketClient, WebSocketClientBuilder, WsMessage,
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// First reconnect delay; doubled on every further attempt (3s .. 48s)
pub const RECONNECT_BASE_DELAY: Duration = Duration::from_millis(3000);

pub const RECONNECT_MAX_DELAY: Duration = Duration::from_millis(48_000);

/// Failed reconnects before the feed gives up
pub const MAX_RECONNECT_ATTEMPTS: usize = 5;

/// Reconnect schedule used by [`TickerFeed::spawn`].
pub fn default_backoff() -> ExponentialBackoff {
    ExponentialBackoff::new(
        RECONNECT_BASE_DELAY,
        RECONNECT_MAX_DELAY,
        Some(MAX_RECONNECT_ATTEMPTS),
    )
}

// =============================================================================
// Router - Parses WebSocket messages
// =============================================================================

/// Router for parsing Binance WebSocket messages
pub struct BinanceRouter;

impl BinanceRouter {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous body of [`MessageRouter::parse`].
    pub fn parse_text(text: &str) -> hypersockets::Result<BinanceMessage> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| HyperSocketError::ParseError(format!("invalid JSON: {}", e)))?;

        let event_type = value.get("e").and_then(|e| e.as_str());
        if event_type != Some(TICKER_EVENT) {
            debug!("[Binance WS] Ignoring non-ticker frame: {}", text);
            return Ok(BinanceMessage::Unknown(text.to_string()));
        }

        serde_json::from_value::<BinanceTickerEvent>(value)
            .map(BinanceMessage::Ticker)
            .map_err(|e| HyperSocketError::ParseError(format!("malformed ticker: {}", e)))
    }
}

impl Default for BinanceRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MessageRouter for BinanceRouter {
    type Message = BinanceMessage;

    async fn parse(&self, message: WsMessage) -> hypersockets::Result<Self::Message> {
        match message.as_text() {
            Some(text) => Self::parse_text(text),
            None => Ok(BinanceMessage::Unknown("Binary data".to_string())),
        }
    }
}

// =============================================================================
// Handler - Folds ticker events into the token book
// =============================================================================

/// Handler for processing Binance ticker messages
pub struct FeedHandler {
    state: SharedFeedState,
    message_count: u64,
}

impl FeedHandler {
    pub fn new(state: SharedFeedState) -> Self {
        Self {
            state,
            message_count: 0,
        }
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    fn handle_ticker(&mut self, event: &BinanceTickerEvent) -> Option<TickOutcome> {
        let Some(tick) = event.to_price_tick() else {
            warn!("[Binance WS] Unknown symbol: {}", event.symbol);
            return None;
        };

        let outcome = self.state.write().apply_tick(&tick);

        match &outcome {
            TickOutcome::Applied {
                token_id,
                market_cap,
            } => {
                debug!(
                    "[Binance WS] {} = ${} ({:+}%, cap {:.0})",
                    token_id, tick.price, tick.change_24h, market_cap
                );
            }
            TickOutcome::NonFinite { token_id } => {
                warn!(
                    "[Binance WS] Dropping {} tick with invalid numbers (c={}, P={}, q={})",
                    token_id, event.last_price, event.change_percent, event.quote_volume
                );
            }
            TickOutcome::InvalidMarketCap { token_id } => {
                warn!(
                    "[Binance WS] Dropping {} tick: market cap estimate is not finite",
                    token_id
                );
            }
            TickOutcome::UnknownToken(token_id) => {
                warn!("[Binance WS] No token '{}' in the book", token_id);
            }
        }

        Some(outcome)
    }
}

impl MessageHandler<BinanceMessage> for FeedHandler {
    fn handle(&mut self, message: BinanceMessage) -> hypersockets::Result<()> {
        self.message_count += 1;

        match message {
            BinanceMessage::Ticker(event) => {
                self.handle_ticker(&event);
            }
            BinanceMessage::Unknown(_) => {}
        }

        Ok(())
    }
}

/// Mirrors connection lifecycle into the shared state.
pub struct FeedStateHandler {
    state: SharedFeedState,
}

impl FeedStateHandler {
    pub fn new(state: SharedFeedState) -> Self {
        Self { state }
    }
}

impl StateHandler for FeedStateHandler {
    fn handle_event(&mut self, event: &ClientEvent) {
        match event {
            ClientEvent::Connecting { attempt } => {
                debug!("[Binance WS] Connecting (attempt {})", attempt)
            }
            ClientEvent::Connected => info!("[Binance WS] Connected to ticker feed"),
            ClientEvent::Disconnected => warn!("[Binance WS] Disconnected from ticker feed"),
            ClientEvent::Reconnecting { attempt, delay } => warn!(
                "[Binance WS] Reconnecting in {}ms (attempt {}/{})",
                delay.as_millis(),
                attempt,
                MAX_RECONNECT_ATTEMPTS
            ),
            ClientEvent::Error(err) => warn!("[Binance WS] Error: {}", err),
            ClientEvent::SubscriptionFailed(err) => {
                warn!("[Binance WS] Subscribe request failed: {}", err)
            }
            ClientEvent::GaveUp { attempts } => warn!(
                "[Binance WS] Giving up after {} reconnection attempts",
                attempts
            ),
        }

        self.state.write().apply_event(event);
    }
}

// =============================================================================
// TickerFeed
// =============================================================================

/// Live token feed: the observable state plus the client that updates it.
///
/// Dropping the feed stops the client; [`shutdown`](Self::shutdown) also
/// waits for the I/O task to finish.
pub struct TickerFeed {
    state: SharedFeedState,
    client: WebSocketClient,
}

impl TickerFeed {
    /// Start the feed described by `config`. Must be called inside a tokio
    /// runtime; connecting begins immediately.
    pub async fn spawn(config: &BoardConfig) -> Result<Self> {
        Self::connect(&config.feed.ws_url, config.tokens.clone(), default_backoff()).await
    }

    /// Start a feed against `url` with an explicit reconnect strategy.
    pub async fn connect(
        url: &str,
        seeds: Vec<Token>,
        strategy: impl ReconnectionStrategy + 'static,
    ) -> Result<Self> {
        let state = FeedState::new(seeds).into_shared();

        info!("================================================================");
        info!("  STARTING BINANCE TICKER FEED");
        info!("================================================================");
        info!("  URL: {}", url);
        info!("  Tokens: {}", state.read().book().len());
        info!("================================================================");

        let handler = FeedHandler::new(state.clone());
        let client = WebSocketClientBuilder::new()
            .url(url)
            .router(BinanceRouter::new(), move |routing| routing.handler(handler))
            .state_handler(FeedStateHandler::new(state.clone()))
            .reconnect_strategy(strategy)
            .subscription(WsMessage::Text(subscribe_message()))
            .build()
            .await?;

        Ok(Self { state, client })
    }

    /// Shared handle for readers.
    pub fn state(&self) -> SharedFeedState {
        self.state.clone()
    }

    pub fn metrics(&self) -> Metrics {
        self.client.metrics()
    }

    pub fn is_running(&self) -> bool {
        self.client.is_running()
    }

    /// Cancel any pending reconnect and close the socket. Idempotent.
    pub async fn shutdown(&mut self) {
        info!("[Binance WS] Closing ticker feed");
        if let Err(e) = self.client.shutdown().await {
            warn!("[Binance WS] Error during shutdown: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::default_tokens;

    fn shared() -> SharedFeedState {
        FeedState::new(default_tokens()).into_shared()
    }

    fn ticker(symbol: &str, price: &str) -> String {
        format!(
            r#"{{"e":"24hrTicker","E":1718000000000,"s":"{}","c":"{}","P":"2.5","q":"1000000"}}"#,
            symbol, price
        )
    }

    #[test]
    fn test_router_ignores_subscribe_ack() {
        let message = BinanceRouter::parse_text(r#"{"result":null,"id":1}"#).unwrap();
        assert!(matches!(message, BinanceMessage::Unknown(_)));
    }

    #[test]
    fn test_router_rejects_invalid_json() {
        assert!(matches!(
            BinanceRouter::parse_text("not json"),
            Err(HyperSocketError::ParseError(_))
        ));
    }

    #[test]
    fn test_router_rejects_ticker_missing_fields() {
        assert!(BinanceRouter::parse_text(r#"{"e":"24hrTicker","s":"BTCUSDT"}"#).is_err());
    }

    #[test]
    fn test_handler_folds_ticker() {
        let state = shared();
        let mut handler = FeedHandler::new(state.clone());

        let message = BinanceRouter::parse_text(&ticker("SOLUSDT", "150")).unwrap();
        handler.handle(message).unwrap();

        let guard = state.read();
        let sol = guard.book().get("solana").unwrap();
        assert_eq!(sol.price, 150.0);
        assert_eq!(sol.change_24h, 2.5);
        assert_eq!(sol.volume_24h, 1_000_000.0);
        assert_eq!(guard.revision(), 1);
        assert_eq!(handler.message_count(), 1);
    }

    #[test]
    fn test_handler_drops_unmapped_and_nan() {
        let state = shared();
        let before = state.read().tokens();
        let mut handler = FeedHandler::new(state.clone());

        for raw in [ticker("LTCUSDT", "80"), ticker("BTCUSDT", "NaN")] {
            let message = BinanceRouter::parse_text(&raw).unwrap();
            assert!(handler.handle(message).is_ok());
        }

        let after = state.read().tokens();
        assert!(before
            .iter()
            .zip(after.iter())
            .all(|(a, b)| std::sync::Arc::ptr_eq(a, b)));
        assert_eq!(state.read().revision(), 0);
    }

    #[test]
    fn test_state_handler_records_give_up() {
        let state = shared();
        let mut handler = FeedStateHandler::new(state.clone());
        handler.handle_event(&ClientEvent::GaveUp { attempts: 5 });

        assert!(state.read().last_error().unwrap().is_terminal());
    }

    #[test]
    fn test_default_backoff_schedule() {
        let backoff = default_backoff();
        let delays: Vec<u64> = (0..MAX_RECONNECT_ATTEMPTS)
            .filter_map(|attempt| backoff.next_delay(attempt))
            .map(|d| d.as_millis() as u64)
            .collect();

        assert_eq!(delays, vec![3000, 6000, 12000, 24000, 48000]);
        assert!(backoff.next_delay(MAX_RECONNECT_ATTEMPTS).is_none());
    }
}
