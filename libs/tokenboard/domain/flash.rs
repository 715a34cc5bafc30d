//! Price-flash detection
//!
//! A flash is a short-lived "up"/"down" tag raised when a value changes.
//! Expiry is a deadline checked against the caller's clock, so a newer
//! change simply replaces the old deadline.

use super::token::Token;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long a flash stays visible.
pub const FLASH_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashDirection {
    #[default]
    None,
    Up,
    Down,
}

/// Flash state for one value stream.
#[derive(Debug, Clone)]
pub struct PriceFlash {
    previous: Option<f64>,
    direction: FlashDirection,
    expires_at: Option<Instant>,
    duration: Duration,
}

impl PriceFlash {
    pub fn new() -> Self {
        Self::with_duration(FLASH_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            previous: None,
            direction: FlashDirection::None,
            expires_at: None,
            duration,
        }
    }

    /// Feed the next value. Returns the direction when it differs from the
    /// previous one; the first value only sets the baseline.
    pub fn observe(&mut self, value: f64, now: Instant) -> Option<FlashDirection> {
        let previous = self.previous.replace(value)?;
        if value == previous {
            return None;
        }

        self.direction = if value > previous {
            FlashDirection::Up
        } else {
            FlashDirection::Down
        };
        self.expires_at = Some(now + self.duration);
        Some(self.direction)
    }

    /// Direction visible at `now`.
    pub fn current(&self, now: Instant) -> FlashDirection {
        match self.expires_at {
            Some(deadline) if now < deadline => self.direction,
            _ => FlashDirection::None,
        }
    }
}

impl Default for PriceFlash {
    fn default() -> Self {
        Self::new()
    }
}

/// One [`PriceFlash`] per token id.
#[derive(Debug, Default)]
pub struct FlashTracker {
    flashes: HashMap<String, PriceFlash>,
    duration: Option<Duration>,
}

impl FlashTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            flashes: HashMap::new(),
            duration: Some(duration),
        }
    }

    /// Feed the latest prices of every token.
    pub fn observe(&mut self, tokens: &[Arc<Token>], now: Instant) {
        let duration = self.duration.unwrap_or(FLASH_DURATION);
        for token in tokens {
            self.flashes
                .entry(token.id.clone())
                .or_insert_with(|| PriceFlash::with_duration(duration))
                .observe(token.price, now);
        }
    }

    pub fn direction(&self, token_id: &str, now: Instant) -> FlashDirection {
        self.flashes
            .get(token_id)
            .map_or(FlashDirection::None, |flash| flash.current(now))
    }
}
