//! Directory-level watch for a single buffer file.
//!
//! The *containing directory* is watched, not the file: atomic saves replace
//! the file's inode, which would silently detach a file-level watch.
//!
//! ```text
//! notify backend thread                     Tokio runtime
//! ┌─────────────────────┐  unbounded  ┌──────────────────────────────────┐
//! │ RecommendedWatcher  │ ──────────► │ watch_loop                       │
//! │ (dir, non-recursive)│   events    │  filter by file name             │
//! └─────────────────────┘             │  debounce burst                  │
//!                                     │  re-read, compare with SyncState │
//!                                     │  ChangeNotifier::notify          │
//!                                     └──────────────────────────────────┘
//! ```

use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use notify::Event;
use notify::EventKind;
use notify::RecommendedWatcher;
use notify::RecursiveMode;
use notify::Watcher;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

use super::event::WatchContext;
use crate::file_io;
use crate::Result;
use crate::WatchError;

/// Shared between a buffer and its watcher task. Holds the content most
/// recently written by this process so the watcher can tell its echo apart
/// from external edits.
#[derive(Debug, Default)]
pub(crate) struct SyncState {
    last_saved: Mutex<Option<String>>,
}

impl SyncState {
    /// Called before the write is issued.
    pub(crate) fn record_save(
        &self,
        content: &str,
    ) {
        *self.last_saved.lock() = Some(content.to_string());
    }

    pub(crate) fn last_saved(&self) -> Option<String> {
        self.last_saved.lock().clone()
    }

    /// True when `content` read from disk is not the echo of our own write
    pub(crate) fn is_external(
        &self,
        content: &str,
    ) -> bool {
        self.last_saved.lock().as_deref() != Some(content)
    }
}

/// Live watch on the directory containing one buffer file.
/// Dropping it stops the backend watcher and the event task.
pub(crate) struct DirectoryWatch {
    _watcher: RecommendedWatcher,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    ctx: WatchContext,
}

impl std::fmt::Debug for DirectoryWatch {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("DirectoryWatch")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl DirectoryWatch {
    /// Arms a non-recursive watch on `path`'s parent directory.
    ///
    /// Must be called from within a Tokio runtime; the event task is spawned
    /// on the current one.
    pub(crate) fn start(
        name: &str,
        path: &Path,
        state: Arc<SyncState>,
        ctx: &WatchContext,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| WatchError::NoRuntime)?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| WatchError::MissingParent(path.to_path_buf()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| WatchError::MissingParent(path.to_path_buf()))?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let buffer_name = name.to_string();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let _ = event_tx.send(event);
                }
                Err(e) => {
                    warn!(buffer = %buffer_name, %e, "directory watcher error");
                }
            },
            notify::Config::default(),
        )
        .map_err(WatchError::from)?;
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(WatchError::from)?;

        let cancel = CancellationToken::new();
        let task = runtime.spawn(watch_loop(
            WatchTarget {
                name: name.to_string(),
                path: path.to_path_buf(),
                file_name,
            },
            event_rx,
            state,
            ctx.clone(),
            cancel.clone(),
        ));

        ctx.active.fetch_add(1, Ordering::SeqCst);
        debug!(buffer = %name, dir = %dir.display(), "directory watch armed");

        Ok(Self {
            _watcher: watcher,
            cancel,
            task,
            ctx: ctx.clone(),
        })
    }
}

impl Drop for DirectoryWatch {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
        self.ctx.active.fetch_sub(1, Ordering::SeqCst);
    }
}

struct WatchTarget {
    name: String,
    path: PathBuf,
    file_name: OsString,
}

impl WatchTarget {
    fn concerns(
        &self,
        event: &Event,
    ) -> bool {
        if matches!(event.kind, EventKind::Access(_)) {
            return false;
        }
        event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(self.file_name.as_os_str()))
    }
}

async fn watch_loop(
    target: WatchTarget,
    mut events: mpsc::UnboundedReceiver<Event>,
    state: Arc<SyncState>,
    ctx: WatchContext,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(event) => event,
                None => break,
            },
        };

        if !target.concerns(&event) {
            trace!(buffer = %target.name, ?event, "ignoring unrelated directory event");
            continue;
        }

        if !ctx.debounce.is_zero()
            && !settle(&target, &mut events, &cancel, ctx.debounce).await
        {
            break;
        }

        on_file_event(&target, &state, &ctx).await;
    }
    debug!(buffer = %target.name, "directory watch loop stopped");
}

/// Upper bound on one settle, in debounce windows
const SETTLE_LIMIT_WINDOWS: u32 = 20;

/// Absorbs follow-up events for the buffer file until it has been quiet for
/// `window`, or until `SETTLE_LIMIT_WINDOWS` windows have passed while it
/// keeps changing. Events for other files do not extend the wait.
/// Returns false when the watch is shutting down.
async fn settle(
    target: &WatchTarget,
    events: &mut mpsc::UnboundedReceiver<Event>,
    cancel: &CancellationToken,
    window: Duration,
) -> bool {
    let quiet = tokio::time::sleep(window);
    let limit = tokio::time::sleep(window.saturating_mul(SETTLE_LIMIT_WINDOWS));
    tokio::pin!(quiet);
    tokio::pin!(limit);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return false,
            _ = &mut quiet => return true,
            _ = &mut limit => {
                debug!(buffer = %target.name, "buffer file still changing, re-reading anyway");
                return true;
            }
            event = events.recv() => match event {
                Some(event) if target.concerns(&event) => {
                    quiet.as_mut().reset(Instant::now() + window);
                }
                Some(_) => {}
                None => return false,
            },
        }
    }
}

async fn on_file_event(
    target: &WatchTarget,
    state: &SyncState,
    ctx: &WatchContext,
) {
    let content = match file_io::read_to_string(&target.path).await {
        Ok(content) => content,
        Err(e) if e.is_not_found() => {
            debug!(buffer = %target.name, "buffer file momentarily absent, skipping");
            return;
        }
        Err(e) => {
            warn!(buffer = %target.name, %e, "failed to re-read buffer file");
            return;
        }
    };

    if state.is_external(&content) {
        info!(buffer = %target.name, bytes = content.len(), "external change detected");
        ctx.notifier.notify(&target.name, content);
    } else {
        debug!(buffer = %target.name, "suppressed echo of known content");
    }
}
