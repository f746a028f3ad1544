//! Server assembly and configuration

pub mod builder;
pub mod config;

pub use builder::A2AServerBuilder;
pub use config::{ConfigError, ServerConfig, DEFAULT_PORT};
