//! Named text buffers persisted as plain files, kept in sync with edits
//! made by other processes.
//!
//! A [`BufferRegistry`] owns one [`Buffer`] per configured name. Each buffer
//! saves atomically and watches its directory, reporting external
//! modifications as [`BufferChange`]s while ignoring its own writes. The
//! [`BufferService`] exposes those operations to a UI through a
//! [`BufferClient`].

mod buffer;
mod config;
pub mod constants;
mod errors;
mod registry;
mod service;
pub mod utils;

pub use buffer::*;
pub use config::*;
pub use errors::*;
pub use registry::*;
pub use service::*;
pub use utils::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
