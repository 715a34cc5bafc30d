//! Graceful shutdown

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::info;

/// Process-wide running flag plus a wakeup for tasks parked on it.
///
/// The flag follows the hypersockets convention: `true` while running.
#[derive(Clone)]
pub struct ShutdownManager {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(true)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Trigger shutdown on Ctrl+C.
    pub fn spawn_signal_handler(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal (Ctrl+C), shutting down");
                manager.trigger();
            }
        });
    }

    pub fn trigger(&self) {
        self.flag.store(false, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_running(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Shared flag for components that poll it.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Resolves once shutdown has been triggered.
    pub async fn wait(&self) {
        while self.is_running() {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before re-checking so a trigger in between is not lost
            notified.as_mut().enable();
            if !self.is_running() {
                break;
            }
            notified.await;
        }
    }

    /// Sleep for `duration` or until shutdown, whichever comes first.
    /// Returns `true` if still running afterwards.
    pub async fn interruptible_sleep(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = self.wait() => {}
        }
        self.is_running()
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
