//! Client runtime: connection state, reconnection state machine, the I/O
//! task and its builder.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hypersockets::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut client = hypersockets::builder()
//!         .url("wss://stream.binance.com:9443/ws")
//!         .router(TickerRouter, |routing| routing.handler(TickerHandler::default()))
//!         .reconnect_strategy(ExponentialBackoff::new(
//!             Duration::from_secs(3),
//!             Duration::from_secs(48),
//!             Some(5),
//!         ))
//!         .subscription(WsMessage::Text(subscribe_json))
//!         .build()
//!         .await?;
//!
//!     while let Some(event) = client.recv_event_timeout(Duration::from_secs(1)) {
//!         println!("Event: {:?}", event);
//!     }
//!
//!     client.shutdown().await
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connection_state;
pub mod reconnect;

pub use builder::{states, RoutingBuilder, WebSocketClientBuilder};
pub use client::{ClientEvent, Metrics, WebSocketClient};
pub use config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT};
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
pub use reconnect::{ReconnectDecision, Reconnector};

pub use crate::traits::*;

/// Start building a client.
///
/// ```ignore
/// let client = hypersockets::builder()
///     .url("wss://api.example.com")
///     .router(MyRouter, |routing| routing.handler(MyHandler::new()))
///     .build()
///     .await?;
/// ```
pub fn builder() -> WebSocketClientBuilder<builder::states::Missing, builder::states::Missing, ()> {
    WebSocketClientBuilder::new()
}
