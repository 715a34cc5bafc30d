use crate::core::client::ClientEvent;

/// Observes connection lifecycle transitions.
///
/// Called on the I/O task, interleaved with message handling, so a handler
/// that also owns message state sees lifecycle changes and messages in one
/// consistent order.
pub trait StateHandler: Send + 'static {
    fn handle_event(&mut self, event: &ClientEvent);
}

/// Ignores every event
pub struct NoOpState;

impl StateHandler for NoOpState {
    fn handle_event(&mut self, _event: &ClientEvent) {}
}
