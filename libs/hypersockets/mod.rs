//! # HyperSockets
//!
//! A small, modular WebSocket client built around a bounded reconnection
//! loop and strictly ordered message handling.
//!
//! ## Features
//!
//! - **Atomic connection state**: `Connecting`, `Connected`, `Disconnected`, `Error`
//! - **Type-state builder**: Compile-time guarantees for required configuration
//! - **Ordered processing**: Messages are parsed and handled in arrival order on the I/O task
//! - **Pluggable strategies**: Exponential backoff, fixed delay, or no reconnection
//! - **Lifecycle events**: Every transition is reported to a `StateHandler` and an event channel

pub mod traits;
pub mod core;

// Re-export all traits
pub use crate::traits::*;

// Re-export core client functionality
pub use crate::core::{
    builder,
    builder::{states, RoutingBuilder, WebSocketClientBuilder},
    client::{ClientEvent, Metrics, WebSocketClient},
    config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT},
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState},
    reconnect::{ReconnectDecision, Reconnector},
};
