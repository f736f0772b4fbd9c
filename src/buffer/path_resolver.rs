//! Maps buffer names to their backing files.
//!
//! A buffer named `n` lives in `<base>/buffer-<n>.txt`, or
//! `<base>/buffer-dev-<n>.txt` under the development naming scheme. The base
//! directory is the configured override (with `~` expanded) or the platform
//! data directory.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::constants::APP_NAME;
use crate::constants::BUFFER_FILE_EXTENSION;
use crate::constants::BUFFER_FILE_PREFIX;
use crate::constants::DEV_BUFFER_FILE_PREFIX;
use crate::BufferConfig;
use crate::Result;
use crate::StorageError;

/// Replaces a leading `~` (followed by end of string or a separator) with the
/// user's home directory. Without a resolvable home the input is unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };
    if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\')) {
        return PathBuf::from(path);
    }

    match dirs::home_dir() {
        Some(home) => {
            let mut expanded = home.into_os_string();
            expanded.push(rest);
            PathBuf::from(expanded)
        }
        None => PathBuf::from(path),
    }
}

pub fn buffer_file_name(
    name: &str,
    is_dev: bool,
) -> String {
    let prefix = if is_dev {
        DEV_BUFFER_FILE_PREFIX
    } else {
        BUFFER_FILE_PREFIX
    };
    format!("{prefix}{name}.{BUFFER_FILE_EXTENSION}")
}

/// Deterministic, unresolved path of a buffer file under `base_dir`.
pub fn resolve_path(
    base_dir: &str,
    name: &str,
    is_dev: bool,
) -> PathBuf {
    expand_home(base_dir).join(buffer_file_name(name, is_dev))
}

/// Resolves symlinks in `path`. A missing file is not an error: the file will
/// be created on first save, so the unresolved path is returned.
pub async fn canonicalize_or_keep(path: PathBuf) -> Result<PathBuf> {
    match tokio::fs::canonicalize(&path).await {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "buffer file absent, keeping unresolved path");
            Ok(path)
        }
        Err(e) => Err(StorageError::at(path, e).into()),
    }
}

/// Per-application platform data directory (e.g. `~/.local/share/notebuf`)
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}

/// Resolves buffer names to canonical paths for one configuration snapshot.
#[derive(Debug, Clone)]
pub struct PathResolver {
    override_dir: Option<String>,
    default_dir: Option<PathBuf>,
    is_dev: bool,
}

impl PathResolver {
    pub fn new(
        override_dir: Option<&str>,
        default_dir: Option<PathBuf>,
        is_dev: bool,
    ) -> Self {
        Self {
            override_dir: override_dir.map(str::to_string),
            default_dir,
            is_dev,
        }
    }

    pub fn from_config(config: &BufferConfig) -> Self {
        Self::new(
            config.settings.override_dir(),
            default_data_dir(),
            config.is_dev(),
        )
    }

    pub fn is_dev(&self) -> bool {
        self.is_dev
    }

    /// The configured override when non-empty, else the platform data dir.
    pub fn base_dir(&self) -> Result<String> {
        if let Some(dir) = &self.override_dir {
            return Ok(dir.clone());
        }
        self.default_dir
            .as_deref()
            .map(|dir| dir.to_string_lossy().into_owned())
            .ok_or_else(|| StorageError::DataDirUnavailable.into())
    }

    /// Unresolved path for `name`
    pub fn buffer_path(
        &self,
        name: &str,
    ) -> Result<PathBuf> {
        Ok(resolve_path(&self.base_dir()?, name, self.is_dev))
    }

    /// Symlink-resolved path for `name`, falling back to the unresolved
    /// path while the file does not exist yet.
    pub async fn canonical_path(
        &self,
        name: &str,
    ) -> Result<PathBuf> {
        canonicalize_or_keep(self.buffer_path(name)?).await
    }

    /// Probe path used to detect an existing buffer store inside `dir`
    pub fn probe_path(
        dir: &Path,
        probe_name: &str,
        is_dev: bool,
    ) -> PathBuf {
        resolve_path(&dir.to_string_lossy(), probe_name, is_dev)
    }
}
