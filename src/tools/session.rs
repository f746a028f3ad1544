//! Study session logging

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{parse_args, to_output, Tool, ToolError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionInput {
    subject: String,
    /// Minutes, at least 1
    duration: f64,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionOutput {
    success: bool,
    session_id: String,
    message: String,
}

/// Logs a study session with duration, subject and topics covered
#[derive(Debug, Clone, Copy, Default)]
pub struct StudySessionTool;

impl Tool for StudySessionTool {
    fn name(&self) -> &'static str {
        "log-study-session"
    }

    fn description(&self) -> &'static str {
        "Log a study session with duration, subject, and topics covered"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subject": {"type": "string"},
                "duration": {"type": "number", "minimum": 1, "description": "Study duration in minutes"},
                "topics": {"type": "array", "items": {"type": "string"}},
                "difficulty": {"type": "string", "enum": ["easy", "medium", "hard"]}
            },
            "required": ["subject", "duration", "topics"]
        })
    }

    fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: SessionInput = parse_args(self.name(), args)?;

        if input.duration < 1.0 {
            return Err(ToolError::invalid_input(
                self.name(),
                "duration must be at least 1 minute",
            ));
        }
        if input.subject.trim().is_empty() {
            return Err(ToolError::invalid_input(self.name(), "subject is required"));
        }

        tracing::debug!(
            subject = %input.subject,
            duration = input.duration,
            topics = input.topics.len(),
            difficulty = ?input.difficulty,
            "study session logged"
        );

        to_output(&SessionOutput {
            success: true,
            session_id: Uuid::now_v7().simple().to_string(),
            message: format!(
                "Study session logged: {} minutes on {}",
                input.duration, input.subject
            ),
        })
    }
}
