use thiserror::Error;

/// Main error type for hypersockets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HyperSocketError {
    /// Handshake or transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Handshake did not finish in time
    #[error("Connection attempt timed out after {0:?}")]
    ConnectTimeout(std::time::Duration),

    /// Frame could not be turned into a typed message
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Outbound frame (e.g. a subscription) could not be written
    #[error("Send error: {0}")]
    Send(String),

    /// Command channel to the I/O task is gone
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reconnection budget exhausted
    #[error("Reconnection failed after {attempts} attempts: {reason}")]
    ReconnectionFailed { attempts: usize, reason: String },
}

/// Result type for hypersockets operations
pub type Result<T> = std::result::Result<T, HyperSocketError>;
