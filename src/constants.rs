// -
// Buffer files

/// Application directory name under the platform data dir
pub const APP_NAME: &str = "notebuf";

/// File name scheme: `buffer-<name>.txt` / `buffer-dev-<name>.txt`
pub(crate) const BUFFER_FILE_PREFIX: &str = "buffer-";
pub(crate) const DEV_BUFFER_FILE_PREFIX: &str = "buffer-dev-";
pub(crate) const BUFFER_FILE_EXTENSION: &str = "txt";

/// Owner-only read/write
pub(crate) const BUFFER_FILE_MODE: u32 = 0o600;

/// Temp files used by atomic writes are hidden siblings of the target
pub(crate) const TEMP_FILE_SUFFIX: &str = ".tmp";

/// Buffer name probed when checking whether a directory already holds buffers
pub(crate) const LOCATION_PROBE_BUFFER: &str = "0";

// -
// Configuration

pub(crate) const ENV_PREFIX: &str = "NOTEBUF";
pub(crate) const ENV_SEPARATOR: &str = "__";
pub(crate) const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

pub(crate) const LOG_FILE_NAME: &str = "notebuf.log";
