//! Configuration management for named buffers.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Environment variable overrides
//! - Configuration file support
//! - Component-wise validation
mod environment;
mod logging;
mod storage;
mod watch;
pub use environment::*;
pub use logging::*;
pub use storage::*;
pub use watch::*;

use std::collections::HashSet;
use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::CONFIG_PATH_ENV;
use crate::constants::ENV_PREFIX;
use crate::constants::ENV_SEPARATOR;
use crate::Error;
use crate::Result;

/// Main configuration container
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BufferConfig {
    /// Where buffer files live
    #[serde(default)]
    pub settings: StorageSettings,
    /// Ordered list of buffer names to open at startup
    #[serde(default = "default_buffers")]
    pub buffers: Vec<String>,
    /// Development/production switches
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Directory watcher tuning
    #[serde(default)]
    pub watch: WatchConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            settings: StorageSettings::default(),
            buffers: default_buffers(),
            environment: EnvironmentConfig::default(),
            watch: WatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BufferConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Configuration sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `NOTEBUF__` prefix (highest priority)
    ///
    /// # Note
    /// Validation is deferred so callers can apply `with_override_config()` first.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("NOTEBUF__SETTINGS__BUFFER_PATH", "~/notes");
    /// let cfg = BufferConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        validate_buffer_names(&self.buffers)?;
        self.watch.validate()?;
        Ok(self)
    }

    /// Development naming scheme in effect
    pub fn is_dev(&self) -> bool {
        self.environment.dev_mode
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .ignore_empty(true)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("buffers")
}

fn default_buffers() -> Vec<String> {
    vec!["0".to_string()]
}

/// Buffer names become part of file names, so they must be plain path segments.
pub fn validate_buffer_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidConfig("buffer name cannot be empty".into()));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(Error::InvalidConfig(format!(
            "buffer name {name:?} must not contain path separators"
        )));
    }
    Ok(())
}

fn validate_buffer_names(names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Err(Error::InvalidConfig(
            "buffers must contain at least one name".into(),
        ));
    }

    let mut seen = HashSet::new();
    for name in names {
        validate_buffer_name(name)?;
        if !seen.insert(name.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "Duplicate buffer name {name:?} in buffers"
            )));
        }
    }
    Ok(())
}
