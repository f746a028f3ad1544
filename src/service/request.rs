//! A2A service request types

use crate::codec::JsonRpcRequest;

/// An inbound call to the agent endpoint
///
/// Pairs the decoded JSON-RPC envelope with the agent identifier taken from
/// the request path. Validation turns it into an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct A2ARequest {
    /// Agent identifier from the route
    pub agent_id: String,

    /// Decoded JSON-RPC envelope
    pub envelope: JsonRpcRequest,
}

impl A2ARequest {
    pub fn new(agent_id: impl Into<String>, envelope: JsonRpcRequest) -> Self {
        Self {
            agent_id: agent_id.into(),
            envelope,
        }
    }
}
