//! Pure reconnection state machine.
//!
//! The client feeds it connection outcomes and acts on the returned
//! decision; no timers or I/O live here.

use crate::traits::ReconnectionStrategy;
use std::time::Duration;

/// What to do after a connection closes (or fails to open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    /// Wait `delay`, then make retry number `attempt` (1-based).
    Retry { attempt: usize, delay: Duration },
    /// Budget spent after `attempts` retries; stay down.
    GiveUp { attempts: usize },
}

/// Tracks retries since the last successful connection.
pub struct Reconnector {
    strategy: Box<dyn ReconnectionStrategy>,
    attempts: usize,
}

impl Reconnector {
    pub fn new(strategy: Box<dyn ReconnectionStrategy>) -> Self {
        Self {
            strategy,
            attempts: 0,
        }
    }

    /// Retries scheduled since the last successful connection.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn on_connected(&mut self) {
        self.attempts = 0;
        self.strategy.reset();
    }

    pub fn on_closed(&mut self) -> ReconnectDecision {
        match self.strategy.next_delay(self.attempts) {
            Some(delay) => {
                self.attempts += 1;
                ReconnectDecision::Retry {
                    attempt: self.attempts,
                    delay,
                }
            }
            None => ReconnectDecision::GiveUp {
                attempts: self.attempts,
            },
        }
    }
}
