//! # StudySync A2A
//!
//! An Agent2Agent (A2A) JSON-RPC endpoint for the StudySync study
//! accountability agent, built on Tower's Service and Layer abstractions.
//!
//! A `message/send` call flows through the HTTP transport, the JSON-RPC
//! codec and the validation layer into the core service, which extracts the
//! user's text, asks a [`generator::TurnGenerator`] for a reply and returns
//! a completed [`protocol::Task`].
//!
//! ## Features
//!
//! - **Lenient extraction**: Accepts the many envelope shapes A2A callers send
//! - **Composable**: Validation and core logic are separate Tower services
//! - **Pluggable generation**: Gemini in production, a scripted generator offline
//! - **Study tools**: Schedules, session logs and progress assessments
//!
//! ## Example
//!
//! ```rust,no_run
//! use studysync_a2a::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_env()?;
//!     let addr = config.socket_addr();
//!
//!     A2AServerBuilder::from_config(&config).build().serve(addr).await?;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod codec;
pub mod extract;
pub mod generator;
pub mod layer;
pub mod protocol;
pub mod server;
pub mod service;
pub mod tools;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        agent::StudySyncAgent,
        generator::{ConversationTurn, GenerateOptions, Generation, MockGenerator, TurnGenerator},
        protocol::error::A2AError,
        protocol::{A2AOperation, AgentCard, Message, MessagePart, Role, Task, TaskState},
        server::{A2AServerBuilder, ServerConfig},
        tools::{Tool, ToolSet},
        transport::HttpServer,
    };
}
