use std::path::Path;
use std::sync::Arc;
use std::sync::Once;
use std::time::Duration;

use notebuf::BufferChange;
use notebuf::BufferClient;
use notebuf::BufferConfig;
use notebuf::BufferRegistry;
use notebuf::BufferService;
use notebuf::ChangeNotifier;
use notebuf::HeadlessPicker;
use notebuf::Lifecycle;
use notebuf::Result;
use notebuf::StaticInitialContent;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

pub const PLACEHOLDER: &str = "nothing saved yet\n";

pub const CHANGE_TIMEOUT: Duration = Duration::from_secs(5);

pub const QUIET_PERIOD: Duration = Duration::from_millis(400);

static LOGGER_INIT: Once = Once::new();

pub fn enable_logger() {
    LOGGER_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn config_in(
    dir: &Path,
    buffers: &[&str],
) -> BufferConfig {
    let mut config = BufferConfig::default();
    config.settings.buffer_path = dir.to_string_lossy().into_owned();
    config.buffers = buffers.iter().map(|b| b.to_string()).collect();
    config.watch.debounce_ms = 50;
    config
}

#[allow(dead_code)]
pub struct Host {
    pub client: BufferClient,
    pub lifecycle: Arc<Lifecycle>,
    pub changes: UnboundedReceiver<BufferChange>,
    pub service: JoinHandle<Result<()>>,
}

/// Wires registry and service the way the binary does.
pub async fn start_host(config: BufferConfig) -> Host {
    enable_logger();
    let lifecycle = Arc::new(Lifecycle::new());
    let (notifier, changes) = ChangeNotifier::channel();
    let content = Arc::new(StaticInitialContent::new(PLACEHOLDER, PLACEHOLDER));
    let mut registry = BufferRegistry::new(config.validate().unwrap(), notifier, content);
    registry.load_all().await.unwrap();
    let (service, client) = BufferService::new(registry, lifecycle.clone(), Box::new(HeadlessPicker), 16);
    Host {
        client,
        lifecycle,
        changes,
        service: tokio::spawn(service.run()),
    }
}

pub async fn next_change(rx: &mut UnboundedReceiver<BufferChange>) -> Option<BufferChange> {
    tokio::time::timeout(CHANGE_TIMEOUT, rx.recv()).await.ok().flatten()
}

#[allow(dead_code)]
pub async fn assert_quiet(rx: &mut UnboundedReceiver<BufferChange>) {
    tokio::time::sleep(QUIET_PERIOD).await;
    assert!(rx.try_recv().is_err(), "unexpected change notification");
}

/// Replaces `path` the way sync tools do: write a sibling, rename over.
pub fn replace_externally(
    path: &Path,
    content: &str,
) {
    let staging = path.with_file_name(".incoming.partial");
    std::fs::write(&staging, content).unwrap();
    std::fs::rename(&staging, path).unwrap();
}
