//! Command dispatch exposing buffer operations to the host UI.
mod client;
mod command;
mod location;
mod service;

pub use client::*;
pub use command::*;
pub use location::*;
pub use service::*;
