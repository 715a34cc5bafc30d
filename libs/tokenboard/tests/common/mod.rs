//! Common test utilities for tokenboard integration tests

#![allow(dead_code)]

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
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

/// 24h ticker payload as Binance sends it (trimmed to the fields we read
/// plus a couple we ignore).
pub fn ticker_frame(symbol: &str, price: &str, change: &str, quote_volume: &str) -> String {
    format!(
        r#"{{"e":"24hrTicker","E":1718000000000,"s":"{}","p":"0","P":"{}","c":"{}","q":"{}","n":1234}}"#,
        symbol, change, price, quote_volume
    )
}

/// Mock ticker endpoint: waits for the client's first text frame (the
/// subscribe request), then replays `frames` and stays open.
pub struct MockTickerServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockTickerServer {
    pub async fn start(frames: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let received = Arc::new(Mutex::new(Vec::new()));

        {
            let shutdown = Arc::clone(&shutdown);
            let received = Arc::clone(&received);

            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        result = listener.accept() => match result {
                            Ok((stream, _)) => {
                                let frames = frames.clone();
                                let shutdown = Arc::clone(&shutdown);
                                let received = Arc::clone(&received);
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, frames, received, shutdown).await;
                                });
                            }
                            Err(_) => break,
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
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        frames: Vec<String>,
        received: Arc<Mutex<Vec<String>>>,
        shutdown: Arc<Notify>,
    ) {
        let Ok(ws_stream) = accept_async(stream).await else {
            return;
        };
        let (mut write, mut read) = ws_stream.split();
        let mut replayed = false;

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        received.lock().unwrap().push(text);
                        if !replayed {
                            replayed = true;
                            for frame in &frames {
                                if write.send(Message::Text(frame.clone())).await.is_err() {
                                    return;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
                _ = shutdown.notified() => break,
            }
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Text frames received from the client so far
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for MockTickerServer {
    fn drop(&mut self) {
        self.shutdown.notify_waiters();
    }
}

/// A local URL nobody listens on.
pub async fn unused_ws_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
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
