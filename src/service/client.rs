use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::sync::oneshot;

use super::BufferCommand;
use super::Responder;
use crate::BufferConfig;
use crate::Error;
use crate::NamedContent;
use crate::Result;
use crate::SaveAck;

/// Cloneable handle used by the UI layer to reach the [`super::BufferService`].
#[derive(Debug, Clone)]
pub struct BufferClient {
    tx: mpsc::Sender<BufferCommand>,
}

impl BufferClient {
    pub(crate) fn new(tx: mpsc::Sender<BufferCommand>) -> Self {
        Self { tx }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Responder<T>) -> BufferCommand,
    ) -> Result<T> {
        let (respond_to, rx) = oneshot::channel();
        let command = build(respond_to);
        let kind = command.kind();

        self.tx
            .send(command)
            .await
            .map_err(|_| Error::ChannelClosed(format!("{kind}: buffer service stopped")))?;
        rx.await
            .map_err(|_| Error::ChannelClosed(format!("{kind}: reply dropped")))?
    }

    /// Buffer content from disk, or placeholder content if it was never saved
    pub async fn load(
        &self,
        name: &str,
    ) -> Result<NamedContent> {
        let name = name.to_string();
        self.request(|respond_to| BufferCommand::Load { name, respond_to })
            .await
    }

    pub async fn save(
        &self,
        name: &str,
        content: &str,
    ) -> Result<SaveAck> {
        let (name, content) = (name.to_string(), content.to_string());
        self.request(|respond_to| BufferCommand::Save {
            name,
            content,
            respond_to,
        })
        .await
    }

    /// Saves, then terminates the service
    pub async fn save_and_quit(
        &self,
        name: &str,
        content: &str,
    ) -> Result<()> {
        let (name, content) = (name.to_string(), content.to_string());
        self.request(|respond_to| BufferCommand::SaveAndQuit {
            name,
            content,
            respond_to,
        })
        .await
    }

    pub async fn select_location(&self) -> Result<Option<PathBuf>> {
        self.request(|respond_to| BufferCommand::SelectLocation { respond_to })
            .await
    }

    pub async fn load_all(&self) -> Result<Vec<NamedContent>> {
        self.request(|respond_to| BufferCommand::LoadAll { respond_to })
            .await
    }

    /// Content of the new buffer arrives on the change channel
    pub async fn register_new(
        &self,
        name: &str,
    ) -> Result<()> {
        let name = name.to_string();
        self.request(|respond_to| BufferCommand::RegisterNew { name, respond_to })
            .await
    }

    pub async fn reload(
        &self,
        config: Option<BufferConfig>,
    ) -> Result<()> {
        let config = config.map(Box::new);
        self.request(|respond_to| BufferCommand::Reload { config, respond_to })
            .await
    }
}
