use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::LOG_FILE_NAME;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Directory for `notebuf.log`; stderr when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_dir.as_ref().map(|dir| dir.join(LOG_FILE_NAME))
    }
}
