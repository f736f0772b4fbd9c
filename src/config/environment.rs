use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EnvironmentConfig {
    /// Use the `buffer-dev-<name>.txt` naming scheme and development placeholder text
    #[serde(default)]
    pub dev_mode: bool,

    /// In development mode, always start from placeholder content even if a file exists
    #[serde(default)]
    pub erase_initial_content: bool,
}

impl EnvironmentConfig {
    /// Forced-reset mode: only honoured in development
    pub fn force_initial_content(&self) -> bool {
        self.dev_mode && self.erase_initial_content
    }
}
