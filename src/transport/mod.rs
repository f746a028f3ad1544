//! Network transports serving the A2A endpoint

pub mod http;

pub use http::{AgentService, AppState, HttpServer};
