//! Message routing
//!
//! ```text
//! WebSocket → Router::parse → Handler::handle
//!                (async)          (sync, in arrival order)
//! ```
//!
//! Both steps run on the client's I/O task, one frame at a time, so a
//! handler observes messages in exactly the order the peer sent them and
//! finishes each one before the next frame is read.

use crate::{Result, WsMessage};
use async_trait::async_trait;
use std::fmt::Debug;

/// Turns raw frames into typed messages.
///
/// A parse error is logged by the client and the frame is dropped; it never
/// terminates the connection.
///
/// # Example
///
/// ```ignore
/// struct TickerRouter;
///
/// #[async_trait]
/// impl MessageRouter for TickerRouter {
///     type Message = TickerMessage;
///
///     async fn parse(&self, message: WsMessage) -> Result<Self::Message> {
///         let text = message.as_text().ok_or_else(|| {
///             HyperSocketError::ParseError("expected text frame".into())
///         })?;
///         serde_json::from_str(text).map_err(|e| HyperSocketError::ParseError(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait MessageRouter: Send + Sync + 'static {
    /// The parsed message type
    type Message: Send + Debug + 'static;

    async fn parse(&self, message: WsMessage) -> Result<Self::Message>;
}

/// Applies parsed messages.
///
/// `handle` is synchronous: the client waits for it before reading the next
/// frame. Errors are logged and processing continues with the next message.
pub trait MessageHandler<M>: Send + 'static
where
    M: Send + Debug + 'static,
{
    fn handle(&mut self, message: M) -> Result<()>;
}

impl<M, F> MessageHandler<M> for F
where
    M: Send + Debug + 'static,
    F: FnMut(M) -> Result<()> + Send + 'static,
{
    fn handle(&mut self, message: M) -> Result<()> {
        self(message)
    }
}
