pub mod states;

use crate::core::client::WebSocketClient;
use crate::core::config::{validate_url, ClientConfig, DEFAULT_CONNECT_TIMEOUT};
use crate::traits::*;
use states::*;
use std::marker::PhantomData;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Type-state builder for [`WebSocketClient`].
///
/// URL and router are required; everything else has a default.
pub struct WebSocketClientBuilder<U, Ro, R>
where
    U: Slot,
    Ro: Slot,
{
    _progress: Progress<U, Ro>,
    url: Option<String>,
    router: Option<R>,
    handler: Option<Box<dyn std::any::Any + Send>>,
    state_handler: Option<Box<dyn StateHandler>>,
    reconnect_strategy: Option<Box<dyn ReconnectionStrategy>>,
    subscriptions: Vec<WsMessage>,
    shutdown_flag: Option<Arc<AtomicBool>>,
    connect_timeout: Option<Duration>,
}

impl WebSocketClientBuilder<Missing, Missing, ()> {
    pub fn new() -> Self {
        Self {
            _progress: PhantomData,
            url: None,
            router: None,
            handler: None,
            state_handler: None,
            reconnect_strategy: None,
            subscriptions: Vec::new(),
            shutdown_flag: None,
            connect_timeout: None,
        }
    }
}

impl Default for WebSocketClientBuilder<Missing, Missing, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ro, R> WebSocketClientBuilder<Missing, Ro, R>
where
    Ro: Slot,
{
    pub fn url(self, url: impl Into<String>) -> WebSocketClientBuilder<Provided, Ro, R> {
        WebSocketClientBuilder {
            _progress: PhantomData,
            url: Some(url.into()),
            router: self.router,
            handler: self.handler,
            state_handler: self.state_handler,
            reconnect_strategy: self.reconnect_strategy,
            subscriptions: self.subscriptions,
            shutdown_flag: self.shutdown_flag,
            connect_timeout: self.connect_timeout,
        }
    }
}

/// Collects the handler for a router's messages.
pub struct RoutingBuilder<R>
where
    R: MessageRouter,
{
    handler: Option<Box<dyn MessageHandler<R::Message>>>,
}

impl<R> RoutingBuilder<R>
where
    R: MessageRouter,
{
    fn new() -> Self {
        Self { handler: None }
    }

    /// Set the handler that receives every parsed message. A later call replaces it.
    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: MessageHandler<R::Message>,
    {
        self.handler = Some(Box::new(handler));
        self
    }
}

impl<U> WebSocketClientBuilder<U, Missing, ()>
where
    U: Slot,
{
    pub fn router<NewR, F>(
        self,
        router: NewR,
        configure_routing: F,
    ) -> WebSocketClientBuilder<U, Provided, NewR>
    where
        NewR: MessageRouter,
        F: FnOnce(RoutingBuilder<NewR>) -> RoutingBuilder<NewR>,
    {
        let routing = configure_routing(RoutingBuilder::<NewR>::new());
        let handler = routing
            .handler
            .map(|h| Box::new(h) as Box<dyn std::any::Any + Send>);

        WebSocketClientBuilder {
            _progress: PhantomData,
            url: self.url,
            router: Some(router),
            handler,
            state_handler: self.state_handler,
            reconnect_strategy: self.reconnect_strategy,
            subscriptions: self.subscriptions,
            shutdown_flag: self.shutdown_flag,
            connect_timeout: self.connect_timeout,
        }
    }
}

// Optional configuration
impl<U, R> WebSocketClientBuilder<U, Provided, R>
where
    U: Slot,
    R: MessageRouter,
{
    pub fn state_handler(mut self, handler: impl StateHandler) -> Self {
        self.state_handler = Some(Box::new(handler));
        self
    }

    pub fn reconnect_strategy(mut self, strategy: impl ReconnectionStrategy + 'static) -> Self {
        self.reconnect_strategy = Some(Box::new(strategy));
        self
    }

    pub fn subscription(mut self, message: WsMessage) -> Self {
        self.subscriptions.push(message);
        self
    }

    pub fn subscriptions(mut self, messages: Vec<WsMessage>) -> Self {
        self.subscriptions.extend(messages);
        self
    }

    /// Share a running flag with other components.
    ///
    /// Storing `false` into it stops the client and prevents reconnection.
    pub fn shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Give up on a handshake after `timeout`; the attempt then counts as a
    /// failed connection. Defaults to 10s.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

impl<R> WebSocketClientBuilder<Provided, Provided, R>
where
    R: MessageRouter,
{
    /// Validate the configuration and start connecting.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn build(self) -> Result<WebSocketClient> {
        let url = self
            .url
            .ok_or_else(|| HyperSocketError::Configuration("URL must be set".into()))?;
        validate_url(&url)?;

        let router = self
            .router
            .ok_or_else(|| HyperSocketError::Configuration("Router must be set".into()))?;

        let handler = match self.handler {
            Some(boxed) => Some(
                *boxed
                    .downcast::<Box<dyn MessageHandler<R::Message>>>()
                    .map_err(|_| {
                        HyperSocketError::Configuration("Handler type mismatch".into())
                    })?,
            ),
            None => None,
        };

        let reconnect_strategy = self.reconnect_strategy.unwrap_or_else(|| {
            Box::new(ExponentialBackoff::new(
                Duration::from_secs(1),
                Duration::from_secs(60),
                Some(10),
            ))
        });

        let config = ClientConfig {
            url,
            router,
            handler,
            state_handler: self.state_handler.unwrap_or_else(|| Box::new(NoOpState)),
            reconnect_strategy,
            subscriptions: self.subscriptions,
            shutdown_flag: self
                .shutdown_flag
                .unwrap_or_else(|| Arc::new(AtomicBool::new(true))),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        };

        Ok(WebSocketClient::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoRouter;

    #[async_trait]
    impl MessageRouter for EchoRouter {
        type Message = String;

        async fn parse(&self, message: WsMessage) -> Result<String> {
            message
                .as_text()
                .map(str::to_string)
                .ok_or_else(|| HyperSocketError::ParseError("binary".into()))
        }
    }

    #[tokio::test]
    async fn test_build_rejects_non_ws_url() {
        let result = WebSocketClientBuilder::new()
            .url("http://localhost:1")
            .router(EchoRouter, |routing| routing)
            .build()
            .await;

        assert!(matches!(result, Err(HyperSocketError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_build_with_closure_handler() {
        let mut client = WebSocketClientBuilder::new()
            .url("ws://127.0.0.1:1")
            .router(EchoRouter, |routing| {
                routing.handler(|_msg: String| -> Result<()> { Ok(()) })
            })
            .reconnect_strategy(NeverReconnect)
            .build()
            .await
            .unwrap();

        client.shutdown().await.unwrap();
        assert!(!client.is_running());
    }
}
