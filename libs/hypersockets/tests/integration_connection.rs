//! Integration tests for a live connection: subscriptions, ordered
//! delivery, parse failures and shutdown.

mod common;

use async_trait::async_trait;
use common::{collect_events_until, wait_until, MockWsServer, ServerScript};
use hypersockets::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
struct Numbered(u64);

/// Accepts frames of the form `n:<u64>`.
struct NumberRouter;

#[async_trait]
impl MessageRouter for NumberRouter {
    type Message = Numbered;

    async fn parse(&self, message: WsMessage) -> Result<Numbered> {
        let text = message
            .as_text()
            .ok_or_else(|| HyperSocketError::ParseError("binary frame".into()))?;
        text.strip_prefix("n:")
            .and_then(|n| n.parse().ok())
            .map(Numbered)
            .ok_or_else(|| HyperSocketError::ParseError(format!("bad frame: {}", text)))
    }
}

struct Collector(Arc<Mutex<Vec<u64>>>);

impl MessageHandler<Numbered> for Collector {
    fn handle(&mut self, message: Numbered) -> Result<()> {
        self.0.lock().unwrap().push(message.0);
        Ok(())
    }
}

#[tokio::test]
async fn test_subscriptions_sent_on_connect() {
    let server = MockWsServer::start().await;

    let mut client = hypersockets::builder()
        .url(server.ws_url())
        .router(NumberRouter, |routing| routing)
        .subscription(WsMessage::Text("sub-a".into()))
        .subscription(WsMessage::Text("sub-b".into()))
        .build()
        .await
        .unwrap();

    assert!(
        wait_until(Duration::from_secs(2), || server.received().len() == 2).await,
        "server never saw both subscriptions"
    );
    assert_eq!(server.received(), vec!["sub-a", "sub-b"]);
    assert!(client.is_connected());
    assert_eq!(client.metrics().messages_sent, 2);

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_messages_handled_in_order_and_bad_frames_skipped() {
    let mut frames: Vec<String> = (0..50).map(|n| format!("n:{}", n)).collect();
    frames.insert(10, "garbage".to_string());
    frames.insert(30, "{\"result\":null,\"id\":1}".to_string());
    let server = MockWsServer::start_with(ServerScript {
        frames,
        close_after_frames: false,
    })
    .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut client = hypersockets::builder()
        .url(server.ws_url())
        .router(NumberRouter, |routing| {
            routing.handler(Collector(Arc::clone(&seen)))
        })
        .build()
        .await
        .unwrap();

    assert!(wait_until(Duration::from_secs(2), || seen.lock().unwrap().len() == 50).await);
    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, (0..50).collect::<Vec<u64>>());
    assert!(client.is_connected(), "parse failures must not drop the connection");

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_lifecycle_events_reach_state_handler() {
    let server = MockWsServer::start().await;
    let events = Arc::new(Mutex::new(Vec::new()));

    let recorded = Arc::clone(&events);
    struct Recorder(Arc<Mutex<Vec<ClientEvent>>>);
    impl StateHandler for Recorder {
        fn handle_event(&mut self, event: &ClientEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    let mut client = hypersockets::builder()
        .url(server.ws_url())
        .router(NumberRouter, |routing| routing)
        .state_handler(Recorder(recorded))
        .build()
        .await
        .unwrap();

    let published =
        collect_events_until(&client, Duration::from_secs(2), |e| *e == ClientEvent::Connected).await;
    assert_eq!(
        published,
        vec![ClientEvent::Connecting { attempt: 0 }, ClientEvent::Connected]
    );

    client.shutdown().await.unwrap();
    let handled = events.lock().unwrap().clone();
    assert_eq!(
        handled,
        vec![
            ClientEvent::Connecting { attempt: 0 },
            ClientEvent::Connected,
            ClientEvent::Disconnected,
        ]
    );
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let server = MockWsServer::start().await;

    let mut client = hypersockets::builder()
        .url(server.ws_url())
        .router(NumberRouter, |routing| routing)
        .build()
        .await
        .unwrap();

    assert!(wait_until(Duration::from_secs(2), || client.is_connected()).await);

    client.shutdown().await.unwrap();
    client.shutdown().await.unwrap();
    assert!(!client.is_running());
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_send_after_connect_reaches_server() {
    let server = MockWsServer::start().await;

    let mut client = hypersockets::builder()
        .url(server.ws_url())
        .router(NumberRouter, |routing| routing)
        .build()
        .await
        .unwrap();

    assert!(wait_until(Duration::from_secs(2), || client.is_connected()).await);
    client.send(WsMessage::Text("hello".into())).unwrap();

    assert!(wait_until(Duration::from_secs(2), || server.received() == vec!["hello"]).await);
    client.shutdown().await.unwrap();
}
