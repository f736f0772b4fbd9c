use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::BufferConfig;
use crate::NamedContent;
use crate::Result;
use crate::SaveAck;

pub type Responder<T> = oneshot::Sender<Result<T>>;

/// Operations the host UI can invoke by name
#[derive(Debug)]
pub enum BufferCommand {
    Load {
        name: String,
        respond_to: Responder<NamedContent>,
    },

    Save {
        name: String,
        content: String,
        respond_to: Responder<SaveAck>,
    },

    SaveAndQuit {
        name: String,
        content: String,
        respond_to: Responder<()>,
    },

    SelectLocation {
        respond_to: Responder<Option<PathBuf>>,
    },

    LoadAll {
        respond_to: Responder<Vec<NamedContent>>,
    },

    RegisterNew {
        name: String,
        respond_to: Responder<()>,
    },

    /// Rebuild the registry, optionally from a new configuration
    Reload {
        config: Option<Box<BufferConfig>>,
        respond_to: Responder<()>,
    },
}

impl BufferCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            BufferCommand::Load { .. } => "load",
            BufferCommand::Save { .. } => "save",
            BufferCommand::SaveAndQuit { .. } => "save_and_quit",
            BufferCommand::SelectLocation { .. } => "select_location",
            BufferCommand::LoadAll { .. } => "load_all",
            BufferCommand::RegisterNew { .. } => "register_new",
            BufferCommand::Reload { .. } => "reload",
        }
    }
}
