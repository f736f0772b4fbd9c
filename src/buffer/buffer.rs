use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use tracing::warn;

use super::event::WatchContext;
use super::watcher::DirectoryWatch;
use super::watcher::SyncState;
use crate::constants::BUFFER_FILE_MODE;
use crate::file_io;
use crate::Result;

/// A buffer's name paired with its content, positionally correlatable in
/// multi-buffer results.
pub type NamedContent = (String, String);

/// Acknowledgement of a completed atomic save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAck {
    pub path: PathBuf,
    pub bytes_written: usize,
}

/// One named, file-backed text buffer.
///
/// State machine: `Unwatched → Watched` once the backing file exists and a
/// load (or construction) arms the watcher, `Watched → Unwatched` on
/// [`Buffer::close`]. At most one watcher is alive at any time.
#[derive(Debug)]
pub struct Buffer {
    name: String,
    path: PathBuf,
    state: Arc<SyncState>,
    watcher: Mutex<Option<DirectoryWatch>>,
    ctx: WatchContext,
}

impl Buffer {
    /// Creates the buffer and opportunistically arms its watcher.
    pub fn new(
        name: impl Into<String>,
        path: PathBuf,
        ctx: WatchContext,
    ) -> Self {
        let buffer = Self {
            name: name.into(),
            path,
            state: Arc::new(SyncState::default()),
            watcher: Mutex::new(None),
            ctx,
        };
        buffer.arm_watcher_best_effort();
        buffer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content most recently handed to [`Buffer::save`], even if that write failed
    pub fn last_saved_content(&self) -> Option<String> {
        self.state.last_saved()
    }

    /// Reads the whole file and arms the watcher.
    ///
    /// # Errors
    /// Fails when the file cannot be read, including when it is absent;
    /// callers that tolerate absence check [`Buffer::exists`] first.
    pub async fn load(&self) -> Result<NamedContent> {
        let content = file_io::read_to_string(&self.path).await?;
        self.arm_watcher_best_effort();
        Ok((self.name.clone(), content))
    }

    /// Atomically replaces the file content with owner-only permissions.
    ///
    /// `content` is recorded as last-saved before the write is issued so the
    /// watcher recognises the echo of this write. A failed write leaves that
    /// record in place.
    pub async fn save(
        &self,
        content: &str,
    ) -> Result<SaveAck> {
        self.state.record_save(content);
        let bytes_written =
            file_io::write_atomic(&self.path, content.as_bytes(), BUFFER_FILE_MODE).await?;
        Ok(SaveAck {
            path: self.path.clone(),
            bytes_written,
        })
    }

    /// True iff the path currently names a regular file
    pub fn exists(&self) -> bool {
        file_io::is_regular_file(&self.path)
    }

    /// Arms the directory watch. No-op when already watched or when the file
    /// does not exist yet.
    pub fn setup_watcher(&self) -> Result<()> {
        let mut slot = self.watcher.lock();
        if slot.is_some() || !self.exists() {
            return Ok(());
        }
        *slot = Some(DirectoryWatch::start(
            &self.name,
            &self.path,
            self.state.clone(),
            &self.ctx,
        )?);
        Ok(())
    }

    pub fn is_watched(&self) -> bool {
        self.watcher.lock().is_some()
    }

    /// Detaches the watcher if present. Safe to call repeatedly.
    pub fn close(&self) {
        if let Some(watch) = self.watcher.lock().take() {
            drop(watch);
            debug!(buffer = %self.name, "directory watch closed");
        }
    }

    fn arm_watcher_best_effort(&self) {
        if let Err(e) = self.setup_watcher() {
            warn!(buffer = %self.name, %e, "watcher setup skipped");
        }
    }
}
