//! File-backed buffers and their synchronization with disk.
//!
//! ## Key Responsibilities
//! - Resolve buffer names to canonical file paths
//! - Load and atomically save buffer content
//! - Watch the containing directory and report external edits, suppressing
//!   the echo of this process's own writes
mod buffer;
mod event;
pub mod path_resolver;
mod watcher;

pub use buffer::*;
pub use event::*;
pub use path_resolver::PathResolver;
