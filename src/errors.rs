//! Buffer Synchronization Error Hierarchy
//!
//! Errors are grouped by the layer that produces them: disk access,
//! directory watching, configuration and command dispatch.

use std::path::PathBuf;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Disk-level failures (read, atomic write, path resolution)
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Directory watch setup failures
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// Configuration source or deserialization failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration validation failures
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation addressed a buffer that is not registered
    #[error("Unknown buffer: {0}")]
    UnknownBuffer(String),

    /// The command service stopped or dropped a reply
    #[error("Service channel closed: {0}")]
    ChannelClosed(String),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Disk I/O failures without path context
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// I/O failure on a specific path
    #[error("Error occurred at path: {path}")]
    PathError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither a configured buffer path nor a platform data directory exists
    #[error("No platform data directory available and no buffer path configured")]
    DataDirUnavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Backend watcher failures
    #[error(transparent)]
    Notify(#[from] notify::Error),

    /// Watchers drive their event loop on the ambient Tokio runtime
    #[error("No async runtime available to drive the watcher")]
    NoRuntime,

    /// The buffer path has no containing directory to watch
    #[error("Path has no parent directory: {0}")]
    MissingParent(PathBuf),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(StorageError::IoError(e))
    }
}

impl StorageError {
    pub(crate) fn at(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        StorageError::PathError {
            path: path.into(),
            source,
        }
    }
}

impl Error {
    /// True when the underlying I/O failure is "file not found"
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Storage(StorageError::IoError(e)) => e.kind() == std::io::ErrorKind::NotFound,
            Error::Storage(StorageError::PathError { source, .. }) => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
