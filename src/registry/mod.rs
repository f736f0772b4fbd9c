//! Collection of active buffers and the process-wide state around them.
mod initial_content;
mod lifecycle;
mod registry;

pub use initial_content::*;
pub use lifecycle::*;
pub use registry::*;
