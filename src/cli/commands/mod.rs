//! Command implementations.

mod demo;
mod features;
mod serve;

pub use demo::cmd_demo;
pub use features::cmd_features;
pub use serve::cmd_serve;
