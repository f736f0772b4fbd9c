use std::io;
use std::sync::Arc;

use notebuf::utils::file_io::open_file_for_append;
use notebuf::BufferChange;
use notebuf::BufferConfig;
use notebuf::BufferRegistry;
use notebuf::BufferService;
use notebuf::ChangeNotifier;
use notebuf::Error;
use notebuf::HeadlessPicker;
use notebuf::Lifecycle;
use notebuf::Result;
use notebuf::StaticInitialContent;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

const COMMAND_CAPACITY: usize = 64;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let settings = BufferConfig::new()?.validate()?;

    // Initializing Logs
    let _guard = init_observability(&settings)?;

    let lifecycle = Arc::new(Lifecycle::new());
    let (notifier, changes) = ChangeNotifier::channel();

    let mut registry =
        BufferRegistry::new(settings, notifier, Arc::new(StaticInitialContent::default()));
    registry.load_all().await?;
    info!(
        buffers = ?registry.names().collect::<Vec<_>>(),
        dev = registry.is_dev(),
        "buffers loaded"
    );

    let (service, client) =
        BufferService::new(registry, lifecycle.clone(), Box::new(HeadlessPicker), COMMAND_CAPACITY);
    let service = tokio::spawn(service.run());

    tokio::spawn(present_changes(changes));

    match client.load_all().await {
        Ok(all) => {
            for (name, content) in all {
                info!(buffer = %name, bytes = content.len(), "buffer ready");
            }
        }
        Err(e) => error!(%e, "initial listing failed"),
    }

    // Listen on Shutdown Signal
    let signal_lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        if let Err(e) = graceful_shutdown(&signal_lifecycle).await {
            error!("Failed to shutdown: {:?}", e);
        }
    });

    info!("Application started. Waiting for CTRL+C signal...");
    match service.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("service stops: {:?}", e),
        Err(e) => error!("service task failed: {:?}", e),
    }

    info!(content_saved = lifecycle.content_saved(), "Exiting program.");
    Ok(())
}

/// Stand-in for a UI: logs every externally modified buffer.
async fn present_changes(mut changes: UnboundedReceiver<BufferChange>) {
    while let Some(change) = changes.recv().await {
        info!(
            buffer = %change.name,
            bytes = change.content.len(),
            "buffer changed on disk"
        );
    }
}

#[cfg(unix)]
async fn graceful_shutdown(lifecycle: &Lifecycle) -> Result<()> {
    use tokio::signal::unix::signal;
    use tokio::signal::unix::SignalKind;

    let mut sigint = signal(SignalKind::interrupt()).map_err(signal_error)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(signal_error)?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }

    lifecycle.request_shutdown();
    Ok(())
}

#[cfg(not(unix))]
async fn graceful_shutdown(lifecycle: &Lifecycle) -> Result<()> {
    tokio::signal::ctrl_c().await.map_err(signal_error)?;
    info!("Ctrl+C detected.");
    lifecycle.request_shutdown();
    Ok(())
}

fn signal_error(e: io::Error) -> Error {
    Error::Fatal(format!("Failed to install signal handler: {e}"))
}

pub fn init_observability(settings: &BufferConfig) -> Result<WorkerGuard> {
    let (non_blocking, guard) = match settings.logging.log_file() {
        Some(path) => tracing_appender::non_blocking(open_file_for_append(path)?),
        None => tracing_appender::non_blocking(io::stderr()),
    };

    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(base_subscriber).init();

    Ok(guard)
}
