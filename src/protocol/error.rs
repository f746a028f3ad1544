//! Error types for A2A protocol operations

use serde_json::{json, Value};
use thiserror::Error;

/// JSON-RPC error code: body is not valid JSON
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC error code: envelope is not a valid request
pub const INVALID_REQUEST: i32 = -32600;
/// JSON-RPC error code: method is not supported
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC error code: unknown agent or unusable params
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC error code: unexpected failure while handling the request
pub const INTERNAL_ERROR: i32 = -32603;

/// Main error type for A2A protocol operations
///
/// Every variant maps onto exactly one JSON-RPC error code and HTTP status.
#[derive(Debug, Error)]
pub enum A2AError {
    /// Request body could not be parsed as JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Envelope has a wrong version tag or no request id
    #[error("Invalid Request: jsonrpc must be \"2.0\" and id is required")]
    InvalidRequest,

    /// Method other than `message/send`
    #[error("Method not supported: {method}. Only '{supported}' is supported.")]
    MethodNotSupported {
        method: String,
        supported: &'static str,
    },

    /// Path agent identifier does not name the hosted agent
    #[error("Agent '{agent_id}' not found. Available agent: {available}")]
    AgentNotFound { agent_id: String, available: String },

    /// Params are present but unusable
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Turn generation did not finish in time
    #[error("Turn generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Any other failure while handling the request
    #[error("Internal error")]
    Internal { details: String },
}

impl A2AError {
    /// Wrap a lower-level failure as an internal error
    pub fn internal(details: impl ToString) -> Self {
        A2AError::Internal {
            details: details.to_string(),
        }
    }

    /// JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        match self {
            A2AError::Parse(_) => PARSE_ERROR,
            A2AError::InvalidRequest => INVALID_REQUEST,
            A2AError::MethodNotSupported { .. } => METHOD_NOT_FOUND,
            A2AError::AgentNotFound { .. } | A2AError::InvalidParams(_) => INVALID_PARAMS,
            A2AError::Timeout(_) | A2AError::Internal { .. } => INTERNAL_ERROR,
        }
    }

    /// HTTP status code the error is reported with
    pub fn http_status(&self) -> u16 {
        match self {
            A2AError::AgentNotFound { .. } => 404,
            A2AError::Timeout(_) | A2AError::Internal { .. } => 500,
            _ => 400,
        }
    }

    /// Message placed in the JSON-RPC error object
    pub fn rpc_message(&self) -> String {
        match self {
            A2AError::Timeout(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }

    /// Optional structured data placed in the JSON-RPC error object
    pub fn data(&self) -> Option<Value> {
        match self {
            A2AError::Internal { details } => Some(json!({ "details": details })),
            A2AError::Timeout(_) => Some(json!({ "details": self.to_string() })),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for A2AError {
    fn from(err: serde_json::Error) -> Self {
        A2AError::internal(err)
    }
}
