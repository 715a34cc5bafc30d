//! Observable feed state
//!
//! The token book plus connection state and last error, shared between the
//! WebSocket I/O task (writer) and the view layer (readers).

use crate::domain::{PriceTick, TickOutcome, Token, TokenBook};
use hypersockets::{ClientEvent, ConnectionState};
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// SharedFeedState
// =============================================================================

/// Shared feed state accessible by handlers and consumers
pub type SharedFeedState = Arc<RwLock<FeedState>>;

/// Errors surfaced to the view through [`FeedState::last_error`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Subscription failed: {0}")]
    Subscription(String),

    #[error("Max reconnection attempts reached")]
    MaxReconnectAttempts { attempts: usize },
}

impl FeedError {
    /// No more reconnects will be attempted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FeedError::MaxReconnectAttempts { .. })
    }
}

// =============================================================================
// FeedState
// =============================================================================

#[derive(Debug, Clone)]
pub struct FeedState {
    book: TokenBook,
    connection_state: ConnectionState,
    last_error: Option<FeedError>,
}

impl FeedState {
    /// Starts in `Connecting`, since the client dials immediately.
    pub fn new(seeds: impl IntoIterator<Item = Token>) -> Self {
        Self {
            book: TokenBook::new(seeds),
            connection_state: ConnectionState::Connecting,
            last_error: None,
        }
    }

    pub fn into_shared(self) -> SharedFeedState {
        Arc::new(RwLock::new(self))
    }

    pub fn book(&self) -> &TokenBook {
        &self.book
    }

    pub fn tokens(&self) -> Vec<Arc<Token>> {
        self.book.snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.book.revision()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }

    pub fn last_error(&self) -> Option<&FeedError> {
        self.last_error.as_ref()
    }

    pub fn apply_tick(&mut self, tick: &PriceTick) -> TickOutcome {
        self.book.apply_tick(tick)
    }

    /// Fold one client lifecycle event.
    pub fn apply_event(&mut self, event: &ClientEvent) {
        match event {
            ClientEvent::Connecting { .. } => {
                self.connection_state = ConnectionState::Connecting;
            }
            ClientEvent::Connected => {
                self.connection_state = ConnectionState::Connected;
                self.last_error = None;
            }
            ClientEvent::Error(reason) => {
                self.connection_state = ConnectionState::Error;
                self.last_error = Some(FeedError::Transport(reason.clone()));
            }
            ClientEvent::SubscriptionFailed(reason) => {
                self.connection_state = ConnectionState::Error;
                self.last_error = Some(FeedError::Subscription(reason.clone()));
            }
            ClientEvent::Disconnected => {
                self.connection_state = ConnectionState::Disconnected;
            }
            // The retry itself reports Connecting once the delay ends
            ClientEvent::Reconnecting { .. } => {}
            ClientEvent::GaveUp { attempts } => {
                self.connection_state = ConnectionState::Error;
                self.last_error = Some(FeedError::MaxReconnectAttempts {
                    attempts: *attempts,
                });
            }
        }
    }
}
