pub mod config;
pub mod logging;
pub mod protocol;
pub mod server;
mod stdio;

pub use config::{ConfigError, ServerConfig, Transport};
pub use server::McpServer;
