//! Study progress assessment

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{parse_args, to_output, Tool, ToolError};

const NEXT_STEPS: &[&str] = &[
    "Review difficult topics using Feynman technique",
    "Create flashcards for key concepts",
    "Practice with past papers or exercises",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressInput {
    subject: String,
    /// Self-rated confidence, 1 to 10
    confidence: f64,
    #[serde(default)]
    topics_mastered: Vec<String>,
    #[serde(default)]
    topics_struggling: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressOutput {
    assessment: &'static str,
    recommendation: String,
    next_steps: Vec<&'static str>,
}

/// Assesses study progress from a self-rated confidence level
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressAssessmentTool;

impl Tool for ProgressAssessmentTool {
    fn name(&self) -> &'static str {
        "assess-progress"
    }

    fn description(&self) -> &'static str {
        "Assess study progress and provide recommendations"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subject": {"type": "string"},
                "confidence": {"type": "number", "minimum": 1, "maximum": 10, "description": "Self-rated confidence level 1-10"},
                "topicsMastered": {"type": "array", "items": {"type": "string"}},
                "topicsStruggling": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["subject", "confidence", "topicsMastered", "topicsStruggling"]
        })
    }

    fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: ProgressInput = parse_args(self.name(), args)?;

        if !(1.0..=10.0).contains(&input.confidence) {
            return Err(ToolError::invalid_input(
                self.name(),
                format!("confidence must be between 1 and 10, got {}", input.confidence),
            ));
        }

        let assessment = if input.confidence >= 8.0 {
            "Excellent progress!"
        } else if input.confidence >= 6.0 {
            "Good progress, keep going!"
        } else {
            "Needs more focus and practice."
        };

        let focus = if input.topics_struggling.is_empty() {
            "reviewing mastered topics".to_string()
        } else {
            input.topics_struggling.join(", ")
        };

        tracing::debug!(
            subject = %input.subject,
            confidence = input.confidence,
            mastered = input.topics_mastered.len(),
            "progress assessed"
        );

        to_output(&ProgressOutput {
            assessment,
            recommendation: format!("Focus on {}", focus),
            next_steps: NEXT_STEPS.to_vec(),
        })
    }
}
