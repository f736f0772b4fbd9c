use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchConfig {
    /// Quiet window that coalesces a burst of directory events for the
    /// buffer file into a single re-read. `0` re-reads on every event.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl WatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(Error::InvalidConfig(format!(
                "watch.debounce_ms {} exceeds maximum {}",
                self.debounce_ms, MAX_DEBOUNCE_MS
            )));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_debounce_ms() -> u64 {
    50
}
