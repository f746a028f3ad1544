//! A2A protocol operations

use serde_json::{Map, Value};

use super::error::A2AError;

/// JSON-RPC method name of the only supported operation
pub const SEND_MESSAGE_METHOD: &str = "message/send";

/// A2A protocol operations served by this agent
///
/// Only `message/send` is served; every other method is rejected during
/// validation.
#[derive(Debug, Clone, PartialEq)]
pub enum A2AOperation {
    /// Send a message to the agent and receive a completed task
    SendMessage(SendMessageParams),
}

impl A2AOperation {
    /// Resolve a JSON-RPC method and its params into an operation
    pub fn from_method(method: &str, params: Option<Value>) -> Result<Self, A2AError> {
        match method {
            SEND_MESSAGE_METHOD => Ok(A2AOperation::SendMessage(SendMessageParams::from_value(
                params,
            )?)),
            other => Err(A2AError::MethodNotSupported {
                method: other.to_string(),
                supported: SEND_MESSAGE_METHOD,
            }),
        }
    }

    /// Get the JSON-RPC method name for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::SendMessage(_) => SEND_MESSAGE_METHOD,
        }
    }
}

/// Params of a `message/send` call
///
/// Callers disagree on the envelope shape (`message`, `messages`, inline
/// `parts`/`text`), so the params object is kept as raw JSON and read
/// through accessors instead of being forced into one schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendMessageParams {
    raw: Map<String, Value>,
}

impl SendMessageParams {
    /// Build params from the envelope's `params` member
    ///
    /// A missing or null member is treated as an empty object.
    pub fn from_value(params: Option<Value>) -> Result<Self, A2AError> {
        match params {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(raw)) => Ok(Self { raw }),
            Some(other) => Err(A2AError::InvalidParams(format!(
                "params must be an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// The params object itself
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// The singular `message` container, if it is an object
    pub fn message(&self) -> Option<&Map<String, Value>> {
        self.raw.get("message").and_then(Value::as_object)
    }

    /// Object entries of the `messages` sequence, in order
    pub fn messages(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.raw
            .get("messages")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }

    /// Caller-supplied context id (`params.contextId`, then `message.contextId`)
    pub fn context_id(&self) -> Option<String> {
        self.correlation_id("contextId")
    }

    /// Caller-supplied task id (`params.taskId`, then `message.taskId`)
    pub fn task_id(&self) -> Option<String> {
        self.correlation_id("taskId")
    }

    /// Caller-supplied id of the inbound message
    pub fn message_id(&self) -> Option<String> {
        self.message()
            .and_then(|message| non_empty_str(message.get("messageId")))
    }

    fn correlation_id(&self, key: &str) -> Option<String> {
        non_empty_str(self.raw.get(key))
            .or_else(|| self.message().and_then(|message| non_empty_str(message.get(key))))
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
