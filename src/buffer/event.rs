use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::warn;

use crate::WatchConfig;

/// Content of a buffer as observed on disk, tagged with the buffer name so
/// the presentation layer can route it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferChange {
    pub name: String,
    pub content: String,
}

/// Sending half of the presentation channel
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: mpsc::UnboundedSender<BufferChange>,
}

impl ChangeNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BufferChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notify(
        &self,
        name: &str,
        content: String,
    ) {
        let change = BufferChange {
            name: name.to_string(),
            content,
        };
        if self.tx.send(change).is_err() {
            warn!(buffer = %name, "presentation channel closed, dropping change");
        }
    }
}

/// Shared by every watcher of one registry. `active` counts live watches.
#[derive(Debug, Clone)]
pub struct WatchContext {
    pub(crate) notifier: ChangeNotifier,
    pub(crate) debounce: Duration,
    pub(crate) active: Arc<AtomicUsize>,
}

impl WatchContext {
    pub fn new(
        notifier: ChangeNotifier,
        config: &WatchConfig,
    ) -> Self {
        Self {
            notifier,
            debounce: config.debounce(),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Number of directory watches currently alive across all buffers
    /// sharing this context
    pub fn active_watchers(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}
