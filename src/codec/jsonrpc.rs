//! JSON-RPC 2.0 codec for the A2A protocol
//!
//! Inbound envelopes are decoded leniently: every member is optional so that
//! a malformed envelope reaches validation and gets a coded error instead of
//! failing deserialization.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    codec::Codec,
    protocol::{error::A2AError, task::Task},
};

/// The only protocol version tag accepted
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRpcRequest {
    /// Protocol version tag; must be "2.0"
    pub jsonrpc: Option<String>,

    /// Caller-supplied request id; `None` when missing or null
    pub id: Option<Value>,

    /// Method name
    pub method: Option<String>,

    /// Method parameters
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Read an envelope out of an arbitrary JSON value
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut obj) = value else {
            return Self::default();
        };

        Self {
            jsonrpc: obj
                .get("jsonrpc")
                .and_then(Value::as_str)
                .map(str::to_string),
            id: obj.remove("id").filter(|id| !id.is_null()),
            method: obj.get("method").and_then(Value::as_str).map(str::to_string),
            params: obj.remove("params"),
        }
    }

    /// The id to echo in a reply (null when absent)
    pub fn reply_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Successful reply carrying a task
    pub fn success(id: Value, task: &Task) -> Result<Self, A2AError> {
        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(serde_json::to_value(task)?),
            error: None,
        })
    }

    /// Error reply for a coded failure
    pub fn error(id: Value, err: &A2AError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: err.code(),
                message: err.rpc_message(),
                data: err.data(),
            }),
        }
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// JSON-RPC 2.0 codec for the `message/send` binding
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonRpcCodec {
    fn decode_request(&self, body: &[u8]) -> Result<JsonRpcRequest, A2AError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| A2AError::Parse(e.to_string()))?;
        Ok(JsonRpcRequest::from_value(value))
    }

    fn encode_response(&self, response: &JsonRpcResponse) -> Result<Bytes, A2AError> {
        let bytes = serde_json::to_vec(response)?;
        Ok(Bytes::from(bytes))
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
