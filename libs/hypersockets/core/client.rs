use crate::core::config::ClientConfig;
use crate::core::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::core::reconnect::{ReconnectDecision, Reconnector};
use crate::traits::*;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Notify};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, Message>;
type WsRead = SplitStream<WsStream>;

/// How often the I/O task re-checks an externally shared shutdown flag.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Internal command messages for client control
#[derive(Debug)]
enum ClientCommand {
    /// Send a message to the WebSocket
    Send(WsMessage),
}

/// Lifecycle events, in the order they happen.
///
/// Each event is delivered to the configured [`StateHandler`] first and then
/// published on the client's event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Opening a connection; `attempt` is 0 for the first one
    Connecting { attempt: usize },
    /// Handshake completed, retry counter reset
    Connected,
    /// Socket closed or failed to open
    Disconnected,
    /// Retry `attempt` scheduled after `delay`
    Reconnecting { attempt: usize, delay: Duration },
    /// Transport failure; the connection is not closed by this event
    Error(String),
    /// A subscription frame could not be written; the connection stays open
    SubscriptionFailed(String),
    /// Retry budget exhausted; the client has stopped
    GaveUp { attempts: usize },
}

/// Client metrics snapshot
#[derive(Debug, Clone)]
pub struct Metrics {
    pub messages_sent: u64,
    pub messages_received: u64,
    pub reconnect_count: u64,
    pub connection_state: ConnectionState,
}

/// Reconnecting WebSocket client.
///
/// One tokio task owns the socket. It parses each incoming frame with the
/// router and hands it to the handler before reading the next one, so
/// message order is preserved end to end.
pub struct WebSocketClient {
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    command_tx: mpsc::UnboundedSender<ClientCommand>,
    event_rx: Receiver<ClientEvent>,
    task_handle: Option<tokio::task::JoinHandle<()>>,
    /// `true` while running; cleared by `shutdown()` or externally
    shutdown_flag: Arc<AtomicBool>,
    shutdown_notify: Arc<Notify>,
}

impl WebSocketClient {
    /// Spawn the I/O task. Called by the builder's `build()`.
    pub(crate) fn new<R>(config: ClientConfig<R>) -> Self
    where
        R: MessageRouter,
    {
        let state = Arc::new(AtomicConnectionState::new(ConnectionState::Connecting));
        let metrics = Arc::new(AtomicMetrics::new());
        let shutdown_flag = Arc::clone(&config.shutdown_flag);
        let shutdown_notify = Arc::new(Notify::new());

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = unbounded();

        let task = ClientTask {
            config,
            state: Arc::clone(&state),
            metrics: Arc::clone(&metrics),
            command_rx,
            event_tx,
            shutdown_notify: Arc::clone(&shutdown_notify),
        };
        let task_handle = tokio::spawn(task.run());

        Self {
            state,
            metrics,
            command_tx,
            event_rx,
            task_handle: Some(task_handle),
            shutdown_flag,
            shutdown_notify,
        }
    }

    /// Queue a frame for the current connection.
    ///
    /// Frames queued while disconnected are written after the next connect.
    pub fn send(&self, message: WsMessage) -> Result<()> {
        self.command_tx
            .send(ClientCommand::Send(message))
            .map_err(|e| HyperSocketError::ChannelSend(e.to_string()))
    }

    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.shutdown_flag.load(Ordering::Acquire)
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            messages_sent: self.metrics.messages_sent(),
            messages_received: self.metrics.messages_received(),
            reconnect_count: self.metrics.reconnect_count(),
            connection_state: self.state.get(),
        }
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event, blocking up to `timeout`
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// The running flag. Storing `false` stops the client within
    /// about 100ms, without reconnecting.
    pub fn shutdown_flag(&self) -> &Arc<AtomicBool> {
        &self.shutdown_flag
    }

    /// Stop the client: cancels a pending reconnect delay, closes the live
    /// socket and waits for the I/O task. Safe to call more than once.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.signal_shutdown();

        if let Some(handle) = self.task_handle.take() {
            info!("Shutting down WebSocket client");
            if let Err(e) = handle.await {
                error!("WebSocket task ended abnormally: {}", e);
            }
        }

        Ok(())
    }

    fn signal_shutdown(&self) {
        self.shutdown_flag.store(false, Ordering::Release);
        self.shutdown_notify.notify_one();
    }
}

impl Drop for WebSocketClient {
    fn drop(&mut self) {
        if self.task_handle.is_some() {
            self.signal_shutdown();
        }
    }
}

/// How a live connection ended.
enum ConnectionEnd {
    /// Peer closed or the stream ended
    Closed,
    /// Local shutdown requested
    Shutdown,
}

/// State owned by the I/O task.
struct ClientTask<R>
where
    R: MessageRouter,
{
    config: ClientConfig<R>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    command_rx: mpsc::UnboundedReceiver<ClientCommand>,
    event_tx: Sender<ClientEvent>,
    shutdown_notify: Arc<Notify>,
}

impl<R> ClientTask<R>
where
    R: MessageRouter,
{
    fn is_running(&self) -> bool {
        self.config.shutdown_flag.load(Ordering::Acquire)
    }

    /// Report a lifecycle event to the state handler, then to subscribers.
    fn emit(&mut self, event: ClientEvent) {
        self.config.state_handler.handle_event(&event);
        // Nobody listening is fine
        let _ = self.event_tx.send(event);
    }

    fn transition(&mut self, state: ConnectionState, event: ClientEvent) {
        self.state.set(state);
        self.emit(event);
    }

    async fn run(mut self) {
        let strategy = std::mem::replace(
            &mut self.config.reconnect_strategy,
            Box::new(NeverReconnect),
        );
        let mut reconnector = Reconnector::new(strategy);
        let mut attempt = 0;

        loop {
            if !self.is_running() {
                break;
            }

            self.transition(ConnectionState::Connecting, ClientEvent::Connecting { attempt });
            debug!("Connecting to {} (attempt {})", self.config.url, attempt);

            let notify = Arc::clone(&self.shutdown_notify);
            let handshake = tokio::time::timeout(
                self.config.connect_timeout,
                connect_async(self.config.url.as_str()),
            );
            let connection = tokio::select! {
                result = handshake => match result {
                    Ok(Ok((ws_stream, _))) => Ok(ws_stream),
                    Ok(Err(e)) => Err(HyperSocketError::WebSocket(e.to_string())),
                    Err(_) => Err(HyperSocketError::ConnectTimeout(self.config.connect_timeout)),
                },
                _ = notify.notified() => break,
            };

            match connection {
                Ok(ws_stream) => {
                    info!("Connected to {}", self.config.url);
                    reconnector.on_connected();
                    self.transition(ConnectionState::Connected, ClientEvent::Connected);

                    match self.handle_connection(ws_stream).await {
                        Ok(ConnectionEnd::Shutdown) => {
                            self.transition(ConnectionState::Disconnected, ClientEvent::Disconnected);
                            break;
                        }
                        Ok(ConnectionEnd::Closed) => {
                            info!("Connection to {} closed", self.config.url);
                        }
                        Err(e) => {
                            error!("Connection error: {}", e);
                            self.transition(ConnectionState::Error, ClientEvent::Error(e.to_string()));
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to connect to {}: {}", self.config.url, e);
                    self.transition(ConnectionState::Error, ClientEvent::Error(e.to_string()));
                }
            }

            self.transition(ConnectionState::Disconnected, ClientEvent::Disconnected);

            if !self.is_running() {
                debug!("Shutdown requested, not reconnecting");
                break;
            }

            match reconnector.on_closed() {
                ReconnectDecision::Retry { attempt: next, delay } => {
                    info!("Reconnecting in {:?} (attempt {})", delay, next);
                    self.metrics.increment_reconnects();
                    self.emit(ClientEvent::Reconnecting { attempt: next, delay });

                    let flag = Arc::clone(&self.config.shutdown_flag);
                    let notify = Arc::clone(&self.shutdown_notify);
                    if !Self::sleep_unless_shutdown(flag, notify, delay).await {
                        debug!("Shutdown requested during reconnection delay");
                        break;
                    }
                    attempt = next;
                }
                ReconnectDecision::GiveUp { attempts } => {
                    let err = HyperSocketError::ReconnectionFailed {
                        attempts,
                        reason: "retry budget exhausted".to_string(),
                    };
                    warn!("{}", err);
                    self.transition(ConnectionState::Error, ClientEvent::GaveUp { attempts });
                    break;
                }
            }
        }

        if self.state.get() == ConnectionState::Connecting {
            self.state.set(ConnectionState::Disconnected);
        }
        info!("Client task exiting");
    }

    /// Returns `false` if shutdown cut the wait short.
    /// Must not borrow `self`: the boxed handlers are not `Sync`.
    async fn sleep_unless_shutdown(
        running: Arc<AtomicBool>,
        notify: Arc<Notify>,
        delay: Duration,
    ) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        let mut poll = tokio::time::interval(SHUTDOWN_POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = &mut sleep => return running.load(Ordering::Acquire),
                _ = notify.notified() => return false,
                _ = poll.tick() => {
                    if !running.load(Ordering::Acquire) {
                        return false;
                    }
                }
            }
        }
    }

    async fn handle_connection(&mut self, ws_stream: WsStream) -> Result<ConnectionEnd> {
        let (mut write, mut read) = ws_stream.split();

        let subscriptions = self.config.subscriptions.clone();
        for subscription in subscriptions {
            match write.send(subscription.into_tungstenite()).await {
                Ok(()) => {
                    self.metrics.increment_sent();
                    debug!("Sent subscription message");
                }
                Err(e) => {
                    let err = HyperSocketError::Send(format!("subscription: {}", e));
                    warn!("{}", err);
                    self.transition(
                        ConnectionState::Error,
                        ClientEvent::SubscriptionFailed(err.to_string()),
                    );
                }
            }
        }

        let end = self.message_loop(&mut write, &mut read).await;
        if matches!(end, Ok(ConnectionEnd::Shutdown)) {
            if let Err(e) = write.close().await {
                debug!("Close on shutdown failed: {}", e);
            }
        }
        end
    }

    async fn message_loop(&mut self, write: &mut WsWrite, read: &mut WsRead) -> Result<ConnectionEnd> {
        let notify = Arc::clone(&self.shutdown_notify);
        let mut poll = tokio::time::interval(SHUTDOWN_POLL_INTERVAL);

        loop {
            tokio::select! {
                biased;

                _ = notify.notified() => {
                    debug!("Shutdown signalled, closing connection");
                    return Ok(ConnectionEnd::Shutdown);
                }

                _ = poll.tick() => {
                    if !self.is_running() {
                        debug!("Shutdown flag cleared, closing connection");
                        return Ok(ConnectionEnd::Shutdown);
                    }
                }

                cmd = self.command_rx.recv() => match cmd {
                    Some(ClientCommand::Send(message)) => {
                        write
                            .send(message.into_tungstenite())
                            .await
                            .map_err(|e| HyperSocketError::WebSocket(e.to_string()))?;
                        self.metrics.increment_sent();
                    }
                    None => {
                        debug!("Client handle dropped, closing connection");
                        self.config.shutdown_flag.store(false, Ordering::Release);
                        return Ok(ConnectionEnd::Shutdown);
                    }
                },

                msg = read.next() => match msg {
                    Some(Ok(Message::Close(frame))) => {
                        debug!("Close frame received: {:?}", frame);
                        return Ok(ConnectionEnd::Closed);
                    }
                    Some(Ok(msg)) => {
                        if let Some(ws_msg) = WsMessage::from_tungstenite(msg) {
                            self.metrics.increment_received();
                            self.dispatch(ws_msg).await;
                        }
                    }
                    Some(Err(e)) => {
                        return Err(HyperSocketError::WebSocket(e.to_string()));
                    }
                    None => {
                        warn!("WebSocket stream closed");
                        return Ok(ConnectionEnd::Closed);
                    }
                },
            }
        }
    }

    /// Parse one frame and hand it to the handler. Never fails the connection.
    async fn dispatch(&mut self, ws_msg: WsMessage) {
        match self.config.router.parse(ws_msg).await {
            Ok(message) => match self.config.handler.as_mut() {
                Some(handler) => {
                    if let Err(e) = handler.handle(message) {
                        warn!("Handler error: {}", e);
                    }
                }
                None => debug!("No handler configured, dropping {:?}", message),
            },
            Err(e) => warn!("Parse error: {}", e),
        }
    }
}
