use std::path::Path;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::constants::LOCATION_PROBE_BUFFER;
use crate::file_io;
use crate::PathResolver;

/// Interactive directory chooser supplied by the host UI.
#[cfg_attr(test, automock)]
pub trait LocationPicker: Send + Sync {
    /// Opens a directory picker. `None` when the user cancels.
    fn pick_directory(&self) -> Option<PathBuf>;

    /// Warns that `dir` already holds a buffer file which will be loaded.
    /// Returns true to continue.
    fn confirm_existing_buffer(
        &self,
        dir: &Path,
    ) -> bool;
}

/// Picker for hosts without a UI: every selection is cancelled.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessPicker;

impl LocationPicker for HeadlessPicker {
    fn pick_directory(&self) -> Option<PathBuf> {
        None
    }

    fn confirm_existing_buffer(
        &self,
        _dir: &Path,
    ) -> bool {
        false
    }
}

/// Lets the user choose a new storage directory.
///
/// Returns `None` on cancellation, or when the directory already contains a
/// buffer file and the user declines to load it.
pub fn select_location(
    picker: &dyn LocationPicker,
    is_dev: bool,
) -> Option<PathBuf> {
    let dir = picker.pick_directory()?;

    let probe = PathResolver::probe_path(&dir, LOCATION_PROBE_BUFFER, is_dev);
    if file_io::is_regular_file(&probe) && !picker.confirm_existing_buffer(&dir) {
        info!(dir = %dir.display(), "location selection declined");
        return None;
    }
    Some(dir)
}
