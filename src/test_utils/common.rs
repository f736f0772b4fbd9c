use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::BufferChange;
use crate::ChangeNotifier;
use crate::WatchConfig;
use crate::WatchContext;

/// Debounce used by watcher tests: short enough to keep tests fast, long
/// enough to coalesce the events of one rename.
pub const TEST_DEBOUNCE_MS: u64 = 50;

/// Upper bound for an expected notification to arrive
pub const CHANGE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to observe silence before concluding no notification is coming
pub const QUIET_PERIOD: Duration = Duration::from_millis(400);

pub fn test_watch_context() -> (WatchContext, UnboundedReceiver<BufferChange>) {
    let (notifier, rx) = ChangeNotifier::channel();
    let config = WatchConfig {
        debounce_ms: TEST_DEBOUNCE_MS,
    };
    (WatchContext::new(notifier, &config), rx)
}

pub async fn next_change(rx: &mut UnboundedReceiver<BufferChange>) -> Option<BufferChange> {
    tokio::time::timeout(CHANGE_TIMEOUT, rx.recv()).await.ok().flatten()
}

/// Lets pending filesystem events drain, then asserts nothing was reported.
pub async fn assert_no_change(rx: &mut UnboundedReceiver<BufferChange>) {
    tokio::time::sleep(QUIET_PERIOD).await;
    match rx.try_recv() {
        Err(TryRecvError::Empty) => {}
        Ok(change) => panic!("unexpected change notification: {change:?}"),
        Err(TryRecvError::Disconnected) => panic!("change channel disconnected"),
    }
}

/// Simulates a sync tool replacing the file: write a sibling, rename over.
pub fn write_externally(
    path: &Path,
    content: &str,
) {
    let staging = path.with_file_name(".external-sync.partial");
    std::fs::write(&staging, content).unwrap();
    std::fs::rename(&staging, path).unwrap();
}
