//! Command loop serving the host UI.
//!
//! ## Key Responsibilities
//! - Owns the [`BufferRegistry`] for the lifetime of the host
//! - Executes [`BufferCommand`]s one at a time, replying on their oneshot
//! - Stops when the [`Lifecycle`] requests shutdown or every client is gone,
//!   closing all watchers on the way out
//!
//! ## Example Usage
//! ```rust,ignore
//! let (service, client) = BufferService::new(registry, lifecycle, Box::new(HeadlessPicker), 64);
//! tokio::spawn(service.run());
//! let (name, content) = client.load("0").await?;
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::select_location;
use super::BufferClient;
use super::BufferCommand;
use super::LocationPicker;
use super::Responder;
use crate::BufferRegistry;
use crate::Lifecycle;
use crate::Result;

pub struct BufferService {
    registry: BufferRegistry,
    lifecycle: Arc<Lifecycle>,
    picker: Box<dyn LocationPicker>,
    commands: mpsc::Receiver<BufferCommand>,
}

impl BufferService {
    pub fn new(
        registry: BufferRegistry,
        lifecycle: Arc<Lifecycle>,
        picker: Box<dyn LocationPicker>,
        capacity: usize,
    ) -> (Self, BufferClient) {
        let (tx, commands) = mpsc::channel(capacity.max(1));
        let service = Self {
            registry,
            lifecycle,
            picker,
            commands,
        };
        (service, BufferClient::new(tx))
    }

    pub fn registry(&self) -> &BufferRegistry {
        &self.registry
    }

    pub async fn run(mut self) -> Result<()> {
        let mut shutdown = self.lifecycle.subscribe();
        info!(buffers = self.registry.len(), "buffer service started");

        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.wait_for(|requested| *requested) => None,
                command = self.commands.recv() => command,
            };
            let Some(command) = next else {
                break;
            };
            self.handle(command).await;
        }

        self.registry.close_all();
        info!(
            content_saved = self.lifecycle.content_saved(),
            "buffer service stopped"
        );
        Ok(())
    }

    async fn handle(
        &mut self,
        command: BufferCommand,
    ) {
        let kind = command.kind();
        debug!(command = kind, "handling command");

        match command {
            BufferCommand::Load { name, respond_to } => {
                reply(kind, respond_to, self.registry.load_if_exists(&name).await);
            }
            BufferCommand::Save {
                name,
                content,
                respond_to,
            } => {
                reply(kind, respond_to, self.registry.save(&name, &content).await);
            }
            BufferCommand::SaveAndQuit {
                name,
                content,
                respond_to,
            } => {
                let result = self
                    .registry
                    .save_and_finalize(&name, &content, &self.lifecycle)
                    .await;
                reply(kind, respond_to, result);
            }
            BufferCommand::SelectLocation { respond_to } => {
                let selected = select_location(self.picker.as_ref(), self.registry.is_dev());
                reply(kind, respond_to, Ok(selected));
            }
            BufferCommand::LoadAll { respond_to } => {
                reply(kind, respond_to, self.registry.list_all().await);
            }
            BufferCommand::RegisterNew { name, respond_to } => {
                reply(kind, respond_to, self.registry.register_new(&name).await);
            }
            BufferCommand::Reload { config, respond_to } => {
                let result = match config {
                    Some(config) => match (*config).validate() {
                        Ok(config) => self.registry.reconfigure(config).await,
                        Err(e) => Err(e),
                    },
                    None => self.registry.load_all().await,
                };
                reply(kind, respond_to, result);
            }
        }
    }
}

fn reply<T>(
    kind: &'static str,
    respond_to: Responder<T>,
    result: Result<T>,
) {
    if let Err(e) = &result {
        warn!(command = kind, %e, "command failed");
    }
    if respond_to.send(result).is_err() {
        debug!(command = kind, "requester went away before reply");
    }
}
