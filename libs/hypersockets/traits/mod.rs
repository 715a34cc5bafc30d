//! # HyperSockets Traits
//!
//! Core traits and types used by the client:
//!
//! - **MessageRouter**: Parse raw WebSocket frames into typed messages
//! - **MessageHandler**: Apply typed messages, one at a time, in order
//! - **ReconnectionStrategy**: Control reconnection delays and the attempt budget
//! - **StateHandler**: Observe connection lifecycle transitions
//!
//! ## Example
//!
//! ```rust,ignore
//! use hypersockets::*;
//!
//! struct PrintHandler;
//!
//! impl MessageHandler<MyMessage> for PrintHandler {
//!     fn handle(&mut self, message: MyMessage) -> Result<()> {
//!         println!("{:?}", message);
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod parser;
pub mod reconnect;
pub mod router;
pub mod state;

// Re-export commonly used types
pub use error::{HyperSocketError, Result};
pub use parser::WsMessage;
pub use reconnect::{ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectionStrategy};
pub use router::{MessageHandler, MessageRouter};
pub use state::{NoOpState, StateHandler};
