use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Lifecycle state of a client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    /// Handshake in progress
    Connecting = 0,
    Connected = 1,
    /// Socket closed; a retry may be pending
    Disconnected = 2,
    /// Transport error, failed subscription or exhausted retries
    Error = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Connected,
            2 => ConnectionState::Disconnected,
            _ => ConnectionState::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Error => "error",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lock-free cell holding a [`ConnectionState`].
#[derive(Debug)]
pub struct AtomicConnectionState {
    inner: AtomicU8,
}

impl AtomicConnectionState {
    pub fn new(state: ConnectionState) -> Self {
        Self {
            inner: AtomicU8::new(state as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.inner.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, state: ConnectionState) {
        self.inner.store(state as u8, Ordering::Release);
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Connected
    }
}

impl Default for AtomicConnectionState {
    fn default() -> Self {
        Self::new(ConnectionState::Connecting)
    }
}

/// Counters shared between the I/O task and the client handle.
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    messages_sent: AtomicU64,
    messages_received: AtomicU64,
    reconnect_count: AtomicU64,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_reconnects(&self) {
        self.reconnect_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    pub fn reconnect_count(&self) -> u64 {
        self.reconnect_count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trips_through_atomic() {
        let state = AtomicConnectionState::default();
        assert_eq!(state.get(), ConnectionState::Connecting);

        for next in [
            ConnectionState::Connected,
            ConnectionState::Disconnected,
            ConnectionState::Error,
        ] {
            state.set(next);
            assert_eq!(state.get(), next);
        }
        assert!(!state.is_connected());
        assert_eq!(ConnectionState::Error.to_string(), "error");
    }

    #[test]
    fn test_metrics_count() {
        let metrics = AtomicMetrics::new();
        metrics.increment_sent();
        metrics.increment_received();
        metrics.increment_received();
        metrics.increment_reconnects();

        assert_eq!(metrics.messages_sent(), 1);
        assert_eq!(metrics.messages_received(), 2);
        assert_eq!(metrics.reconnect_count(), 1);
    }
}
