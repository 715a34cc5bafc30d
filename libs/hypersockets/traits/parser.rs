use tokio_tungstenite::tungstenite::Message;

/// Data frame handed to a [`MessageRouter`](crate::MessageRouter).
///
/// Control frames (ping/pong/close) are handled by the client and never
/// reach the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsMessage {
    Text(String),
    Binary(Vec<u8>),
}

impl WsMessage {
    /// Get the message as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WsMessage::Text(s) => Some(s),
            WsMessage::Binary(_) => None,
        }
    }

    /// Convert an outbound frame to its tungstenite form.
    pub(crate) fn into_tungstenite(self) -> Message {
        match self {
            WsMessage::Text(text) => Message::Text(text),
            WsMessage::Binary(bytes) => Message::Binary(bytes),
        }
    }

    /// Extract the data frame from a tungstenite message, if it carries one.
    pub(crate) fn from_tungstenite(message: Message) -> Option<Self> {
        match message {
            Message::Text(text) => Some(WsMessage::Text(text)),
            Message::Binary(bytes) => Some(WsMessage::Binary(bytes)),
            _ => None,
        }
    }
}

impl From<String> for WsMessage {
    fn from(text: String) -> Self {
        WsMessage::Text(text)
    }
}

impl From<&str> for WsMessage {
    fn from(text: &str) -> Self {
        WsMessage::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_frames_are_not_data() {
        assert_eq!(WsMessage::from_tungstenite(Message::Ping(vec![1])), None);
        assert_eq!(
            WsMessage::from_tungstenite(Message::Text("hi".to_string())),
            Some(WsMessage::Text("hi".to_string()))
        );
        assert_eq!(WsMessage::from("x").as_text(), Some("x"));
    }
}
