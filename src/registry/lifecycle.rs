use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::watch;
use tracing::info;

/// Process-wide shutdown state.
///
/// Created once at startup and read by shutdown logic to tell a clean,
/// saved exit from an unsaved one.
#[derive(Debug)]
pub struct Lifecycle {
    content_saved: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            content_saved: AtomicBool::new(false),
            shutdown_tx,
        }
    }

    pub fn mark_content_saved(&self) {
        self.content_saved.store(true, Ordering::SeqCst);
    }

    pub fn content_saved(&self) -> bool {
        self.content_saved.load(Ordering::SeqCst)
    }

    /// Signals the host to terminate. Idempotent.
    pub fn request_shutdown(&self) {
        if !self.shutdown_tx.send_replace(true) {
            info!("shutdown requested");
        }
    }

    pub fn shutdown_requested(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Receivers created after the request still observe it.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }
}
