//! Mocked collaborators for registry and service tests.
//!
//! The host application supplies placeholder text and the directory picker;
//! both are traits annotated for [mockall], so tests pin down exactly when
//! they are consulted.
//!
//! [mockall]: https://docs.rs/mockall/latest/mockall/

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use super::TEST_DEBOUNCE_MS;
use crate::BufferChange;
use crate::BufferConfig;
use crate::BufferRegistry;
use crate::ChangeNotifier;
use crate::MockInitialContentSource;
use crate::StaticInitialContent;

pub const PLACEHOLDER: &str = "placeholder text\n";
pub const DEV_PLACEHOLDER: &str = "dev placeholder text\n";

/// Configuration rooted at `dir` with the given buffer names.
pub fn test_config(
    dir: &Path,
    buffers: &[&str],
) -> BufferConfig {
    let mut config = BufferConfig::default();
    config.settings.buffer_path = dir.to_string_lossy().into_owned();
    config.buffers = buffers.iter().map(|b| b.to_string()).collect();
    config.watch.debounce_ms = TEST_DEBOUNCE_MS;
    config
}

pub fn static_content() -> Arc<StaticInitialContent> {
    Arc::new(StaticInitialContent::new(PLACEHOLDER, DEV_PLACEHOLDER))
}

/// Initial-content mock that must never be consulted
pub fn untouched_content_source() -> Arc<MockInitialContentSource> {
    let mut source = MockInitialContentSource::new();
    source.expect_initial_content().never();
    Arc::new(source)
}

pub fn test_registry(config: BufferConfig) -> (BufferRegistry, UnboundedReceiver<BufferChange>) {
    let (notifier, rx) = ChangeNotifier::channel();
    (BufferRegistry::new(config, notifier, static_content()), rx)
}
