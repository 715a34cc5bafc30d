//! Common test utilities for HyperSockets integration tests

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use hypersockets::{ClientEvent, WebSocketClient};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// What the server does with each accepted connection.
#[derive(Debug, Clone, Default)]
pub struct ServerScript {
    /// Text frames pushed right after the handshake
    pub frames: Vec<String>,
    /// Close the connection once `frames` are sent
    pub close_after_frames: bool,
}

/// Mock WebSocket server that records what clients send.
pub struct MockWsServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    received: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
}

impl MockWsServer {
    /// Server that keeps connections open and records incoming text frames.
    pub async fn start() -> Self {
        Self::start_with(ServerScript::default()).await
    }

    pub async fn start_with(script: ServerScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));

        {
            let shutdown = Arc::clone(&shutdown);
            let received = Arc::clone(&received);
            let connections = Arc::clone(&connections);

            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        result = listener.accept() => match result {
                            Ok((stream, _)) => {
                                connections.fetch_add(1, Ordering::SeqCst);
                                let script = script.clone();
                                let shutdown = Arc::clone(&shutdown);
                                let received = Arc::clone(&received);
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, script, received, shutdown).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        },
                        _ = shutdown.notified() => break,
                    }
                }
            });
        }

        Self {
            addr,
            shutdown,
            received,
            connections,
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        script: ServerScript,
        received: Arc<Mutex<Vec<String>>>,
        shutdown: Arc<Notify>,
    ) {
        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        for frame in &script.frames {
            if write.send(Message::Text(frame.clone())).await.is_err() {
                return;
            }
        }
        if script.close_after_frames {
            let _ = write.close().await;
            return;
        }

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        received.lock().unwrap().push(text);
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
                _ = shutdown.notified() => break,
            }
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Text frames received from clients so far
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Connections accepted so far
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A local URL nobody listens on.
pub async fn unused_ws_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{}", addr)
}

/// A local URL that accepts TCP connections but never answers the
/// WebSocket handshake. Accepted sockets stay open for the test's lifetime.
pub async fn silent_ws_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("ws://{}", addr)
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// Drain client events until `stop` matches or `timeout` elapses.
pub async fn collect_events_until<F>(
    client: &WebSocketClient,
    timeout: Duration,
    stop: F,
) -> Vec<ClientEvent>
where
    F: Fn(&ClientEvent) -> bool,
{
    let deadline = Instant::now() + timeout;
    let mut events = Vec::new();
    while Instant::now() < deadline {
        while let Some(event) = client.try_recv_event() {
            let done = stop(&event);
            events.push(event);
            if done {
                return events;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    events
}
