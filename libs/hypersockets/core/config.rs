use crate::traits::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Handshake limit when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the I/O task needs, assembled by the builder.
pub struct ClientConfig<R>
where
    R: MessageRouter,
{
    /// WebSocket URL (wss:// or ws://)
    pub(crate) url: String,

    pub(crate) router: R,

    /// Receives every parsed message, in arrival order
    pub(crate) handler: Option<Box<dyn MessageHandler<R::Message>>>,

    /// Receives every lifecycle event, interleaved with messages
    pub(crate) state_handler: Box<dyn StateHandler>,

    pub(crate) reconnect_strategy: Box<dyn ReconnectionStrategy>,

    /// Sent, in order, after every successful connection
    pub(crate) subscriptions: Vec<WsMessage>,

    /// `true` while the client should keep running
    pub(crate) shutdown_flag: Arc<AtomicBool>,

    /// Upper bound on TCP + TLS + WebSocket handshake
    pub(crate) connect_timeout: Duration,
}

/// Accepts only `ws://` and `wss://` URLs.
pub fn validate_url(url: &str) -> Result<()> {
    if url.starts_with("ws://") || url.starts_with("wss://") {
        Ok(())
    } else {
        Err(HyperSocketError::Configuration(format!(
            "URL must start with ws:// or wss://, got '{}'",
            url
        )))
    }
}
