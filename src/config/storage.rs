use serde::Deserialize;
use serde::Serialize;

/// Storage location settings (`settings.bufferPath` in the host's store)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StorageSettings {
    /// Base directory override. Empty means the platform data directory.
    /// A leading `~` is expanded to the user's home directory.
    #[serde(default)]
    pub buffer_path: String,
}

impl StorageSettings {
    pub fn override_dir(&self) -> Option<&str> {
        if self.buffer_path.is_empty() {
            None
        } else {
            Some(&self.buffer_path)
        }
    }
}
