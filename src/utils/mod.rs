/// Module containing environment configuration helpers
pub mod config;
/// Module containing OAuth state generation
pub mod id;
/// Module containing logging utilities
pub mod logger;
/// Module containing secret masking for logs
pub mod mask;

pub use config::*;
pub use id::*;
pub use logger::*;
pub use mask::*;
