//! Outbound task assembly

use serde_json::Value;
use uuid::Uuid;

use crate::{
    generator::ConversationTurn,
    protocol::{Artifact, Message, MessagePart, Task, TaskStatus},
};

/// Name of the artifact carrying tool outputs
pub const TOOL_RESULTS_ARTIFACT: &str = "toolResults";

/// A turn that precedes the agent reply in the task history
#[derive(Debug, Clone, PartialEq)]
pub struct PriorTurn {
    pub turn: ConversationTurn,

    /// Id the caller gave the message, kept when present
    pub message_id: Option<String>,
}

impl From<ConversationTurn> for PriorTurn {
    fn from(turn: ConversationTurn) -> Self {
        Self {
            turn,
            message_id: None,
        }
    }
}

/// Builds the completed task returned by `message/send`
///
/// Identifiers missing from the request are generated once and reused for
/// the task, the status message and every history entry.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    artifact_name: String,
    context_id: Option<String>,
    task_id: Option<String>,
    prior_turns: Vec<PriorTurn>,
    tool_results: Vec<Value>,
}

impl ResponseBuilder {
    /// Start a task for the named agent
    pub fn new(agent_name: &str) -> Self {
        Self {
            artifact_name: format!("{}Response", agent_name),
            context_id: None,
            task_id: None,
            prior_turns: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    pub fn context_id(mut self, context_id: Option<String>) -> Self {
        self.context_id = context_id;
        self
    }

    pub fn task_id(mut self, task_id: Option<String>) -> Self {
        self.task_id = task_id;
        self
    }

    /// Turns to place in the history before the agent reply
    pub fn prior_turns(mut self, turns: impl IntoIterator<Item = PriorTurn>) -> Self {
        self.prior_turns.extend(turns);
        self
    }

    pub fn tool_results(mut self, results: Vec<Value>) -> Self {
        self.tool_results = results;
        self
    }

    /// Assemble the task around the reply text
    pub fn build(self, reply: impl Into<String>) -> Task {
        let task_id = self.task_id.unwrap_or_else(new_id);
        let context_id = self.context_id.unwrap_or_else(new_id);

        let reply = Message::agent(reply)
            .with_message_id(new_id())
            .with_task_id(&task_id);

        let mut artifacts = vec![Artifact::new(
            self.artifact_name,
            vec![MessagePart::text(reply.text())],
        )];
        if !self.tool_results.is_empty() {
            artifacts.push(Artifact::new(
                TOOL_RESULTS_ARTIFACT,
                self.tool_results.into_iter().map(MessagePart::data).collect(),
            ));
        }

        let mut history: Vec<Message> = self
            .prior_turns
            .into_iter()
            .map(|prior| {
                Message::new(prior.turn.role, prior.turn.content)
                    .with_message_id(prior.message_id.unwrap_or_else(new_id))
                    .with_task_id(&task_id)
            })
            .collect();
        history.push(reply.clone());

        Task {
            id: task_id,
            context_id,
            status: TaskStatus::completed(reply),
            artifacts,
            history,
        }
    }
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}
