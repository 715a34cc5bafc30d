//! Binary runner utilities
//!
//! Standard banner, status interval and graceful shutdown for the headless
//! binaries.

use std::time::Duration;

use tokenboard::ShutdownManager;
use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// How often the main loop reports status
    pub status_interval: Duration,
}

impl RunConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status_interval: Duration::from_secs(5),
        }
    }

    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }
}

/// A binary with a status loop that runs until shutdown.
pub trait BinaryRunner {
    fn config(&self) -> &RunConfig;

    fn shutdown_manager(&self) -> &ShutdownManager;

    /// Called once per status interval.
    fn report(&mut self);

    /// Called once after the loop ends; returns a stats line.
    async fn finish(&mut self) -> Option<String>;

    fn print_banner(&self) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("Starting {}", config.name);
        info!("Press Ctrl+C to stop");
        info!("========================================");
        info!("");
    }

    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("{} stopped gracefully", config.name);
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        info!("========================================");
    }

    /// Report every status interval until shutdown, then clean up.
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();

        let interval = self.config().status_interval;
        while self
            .shutdown_manager()
            .interruptible_sleep(interval)
            .await
        {
            self.report();
        }

        let stats = self.finish().await;
        self.print_shutdown(stats.as_deref());
        Ok(())
    }
}
