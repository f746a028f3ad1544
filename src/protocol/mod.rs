//! Core A2A protocol types and definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod agent;
pub mod error;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{AgentCapabilities, AgentCard, AgentSkill};
pub use error::A2AError;
pub use message::{Message, MessagePart, Role};
pub use operation::{A2AOperation, SendMessageParams};
pub use task::{Task, TaskState, TaskStatus};

/// Artifacts represent task outputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Unique identifier of the Artifact
    pub artifact_id: String,

    /// A human readable name for the Artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Contents of the Artifact. Must contain at least one part
    pub parts: Vec<MessagePart>,
}

impl Artifact {
    /// Create a named artifact with a fresh identifier
    pub fn new(name: impl Into<String>, parts: Vec<MessagePart>) -> Self {
        Self {
            artifact_id: Uuid::now_v7().to_string(),
            name: Some(name.into()),
            parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_artifact_serialization() {
        let artifact = Artifact::new("notes", vec![MessagePart::text("hi")]);
        let json = serde_json::to_value(&artifact).unwrap();

        assert!(json["artifactId"].is_string());
        assert_eq!(json["name"], "notes");
        assert_eq!(json["parts"], json!([{"kind": "text", "text": "hi"}]));
    }
}
