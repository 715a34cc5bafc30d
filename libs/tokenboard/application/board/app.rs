//! Main application state for the token board

use std::time::Instant;

use anyhow::Result;
use hypersockets::ConnectionState;
use tokio::runtime::Handle;
use tracing::info;

use super::view::TableView;
use crate::domain::SortKey;
use crate::infrastructure::{BoardConfig, FeedError, SharedFeedState, TickerFeed};

/// Connection summary for the header
#[derive(Debug, Clone, PartialEq)]
pub struct FeedStatus {
    pub connection_state: ConnectionState,
    pub last_error: Option<FeedError>,
    pub revision: u64,
}

/// Main application state
pub struct App {
    /// Sort, cursor, modal and flashes
    pub view: TableView,
    /// Shared state written by the feed
    pub feed_state: SharedFeedState,
    /// Ticker feed (keeps the client alive)
    feed: TickerFeed,
    /// Whether to quit
    pub should_quit: bool,
    /// Tokio runtime handle
    runtime: Handle,
}

impl App {
    /// Start the ticker feed and an empty, loading table.
    pub async fn initialize(runtime: Handle, config: &BoardConfig) -> Result<Self> {
        info!("[Board] Starting ticker feed...");
        let feed = TickerFeed::spawn(config).await?;
        let feed_state = feed.state();

        let mut app = Self {
            view: TableView::new(Instant::now()),
            feed_state,
            feed,
            should_quit: false,
            runtime,
        };
        app.refresh(Instant::now());

        info!("[Board] Ready with {} tokens", app.view.len());
        Ok(app)
    }

    /// Pull the latest feed snapshot into the view.
    pub fn refresh(&mut self, now: Instant) {
        let (tokens, revision) = {
            let state = self.feed_state.read();
            (state.tokens(), state.revision())
        };
        self.view.refresh(tokens, revision, now);
    }

    pub fn status(&self) -> FeedStatus {
        let state = self.feed_state.read();
        FeedStatus {
            connection_state: state.connection_state(),
            last_error: state.last_error().cloned(),
            revision: state.revision(),
        }
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.view.sort_by(key);
    }

    pub fn next_row(&mut self) {
        self.view.next_row();
    }

    pub fn prev_row(&mut self) {
        self.view.prev_row();
    }

    pub fn open_detail(&mut self) {
        self.view.open_detail(Instant::now());
    }

    pub fn close_detail(&mut self) {
        self.view.close_detail();
    }

    /// Shutdown the feed
    pub fn shutdown(&mut self) {
        info!("[Board] Shutting down...");
        self.runtime.block_on(self.feed.shutdown());
    }
}
