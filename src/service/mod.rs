//! Tower Service implementations

pub mod core;
pub mod request;
pub mod response;

pub use core::{StudySyncService, DEFAULT_GENERATOR_TIMEOUT, FALLBACK_REPLY, GREETING_FALLBACK};
pub use request::A2ARequest;
pub use response::{PriorTurn, ResponseBuilder, TOOL_RESULTS_ARTIFACT};
