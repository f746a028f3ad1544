//! A2A task types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{message::Message, Artifact};

/// A task in the A2A protocol
///
/// Each `message/send` call produces one task: the status with the agent's
/// reply, the artifacts derived from it and the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename = "task")]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Context ID grouping related tasks/messages
    #[serde(rename = "contextId")]
    pub context_id: String,

    /// Current status of the task
    pub status: TaskStatus,

    /// Outputs produced while handling the task
    pub artifacts: Vec<Artifact>,

    /// Messages exchanged for this task, oldest first
    pub history: Vec<Message>,
}

impl Task {
    /// Text of the first text part of the first artifact
    pub fn reply_text(&self) -> Option<&str> {
        self.artifacts
            .first()
            .and_then(|artifact| artifact.parts.iter().find_map(|part| part.as_text()))
    }
}

/// Status of a task at a point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// When the state was reached
    pub timestamp: DateTime<Utc>,

    /// The agent message attached to this state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl TaskStatus {
    /// A completed status stamped with the current time
    pub fn completed(message: Message) -> Self {
        Self {
            state: TaskState::Completed,
            timestamp: Utc::now(),
            message: Some(message),
        }
    }
}

/// Task state reported by this agent
///
/// Every `message/send` is answered synchronously, so tasks are only ever
/// reported once they are done.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task completed successfully
    Completed,
}
