use std::ffi::OsString;
use std::fs::create_dir_all;
use std::fs::File;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;
use tracing::debug;
use tracing::error;
use tracing::warn;

use crate::constants::TEMP_FILE_SUFFIX;
use crate::Result;
use crate::StorageError;

pub fn create_parent_dir_if_not_exist(path: &Path) -> Result<()> {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            if let Err(e) = create_dir_all(parent_dir) {
                error!("Failed to create directory {:?}: {:?}", parent_dir, e);
                return Err(StorageError::at(parent_dir, e).into());
            }
        }
    }
    Ok(())
}

pub fn open_file_for_append(path: PathBuf) -> Result<File> {
    create_parent_dir_if_not_exist(&path)?;
    let log_file = match OpenOptions::new().append(true).create(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            return Err(StorageError::at(path, e).into());
        }
    };
    Ok(log_file)
}

/// True iff `path` currently names a regular file.
pub fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Reads the whole file as UTF-8 text.
pub async fn read_to_string(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StorageError::at(path, e).into())
}

/// Hidden, uniquely named sibling used as the staging file of an atomic write.
pub(crate) fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(format!(".{}{}", nanoid::nanoid!(8), TEMP_FILE_SUFFIX));
    path.with_file_name(name)
}

/// Replaces the content of `path` atomically.
///
/// Implements a two-phase write:
/// 1. Write and fsync a temporary sibling created with `mode`
/// 2. Atomically rename it over the target
///
/// Readers observe either the previous or the new content, never a torn file.
/// The staging file is removed when any phase fails.
pub async fn write_atomic(
    path: &Path,
    data: &[u8],
    mode: u32,
) -> Result<usize> {
    create_parent_dir_if_not_exist(path)?;

    let temp_path = temp_sibling(path);
    match stage_and_rename(&temp_path, path, data, mode).await {
        Ok(()) => {
            debug!(path = %path.display(), bytes = data.len(), "atomic write committed");
            Ok(data.len())
        }
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), %cleanup, "failed to remove staging file");
                }
            }
            Err(StorageError::at(path, e).into())
        }
    }
}

async fn stage_and_rename(
    temp_path: &Path,
    final_path: &Path,
    data: &[u8],
    mode: u32,
) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;

    // Phase 1: stage
    let mut file = options.open(temp_path).await?;
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    // Phase 2: atomic rename
    tokio::fs::rename(temp_path, final_path).await
}
