//! Lightweight coaching helpers: mood detection and goal acknowledgements

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{parse_args, to_output, Tool, ToolError};

/// Coarse mood inferred from a user's message
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Tired,
    Motivated,
    Frustrated,
    Neutral,
}

impl Mood {
    /// Keyword classification, first matching group wins
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();

        if contains_any(&lower, &["tired", "burnt out"]) {
            Mood::Tired
        } else if contains_any(&lower, &["happy", "excited"]) {
            Mood::Motivated
        } else if contains_any(&lower, &["frustrated", "stuck"]) {
            Mood::Frustrated
        } else {
            Mood::Neutral
        }
    }
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|word| haystack.contains(word))
}

#[derive(Debug, Deserialize)]
struct TextInput {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GoalInput {
    goal: String,
}

#[derive(Debug, Serialize)]
struct MoodOutput {
    mood: Mood,
}

#[derive(Debug, Serialize)]
struct MessageOutput {
    message: String,
}

fn goal_schema() -> Value {
    json!({
        "type": "object",
        "properties": {"goal": {"type": "string"}},
        "required": ["goal"]
    })
}

/// Classifies the mood of a message
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeMoodTool;

impl Tool for AnalyzeMoodTool {
    fn name(&self) -> &'static str {
        "analyze-mood"
    }

    fn description(&self) -> &'static str {
        "Detect whether the learner sounds tired, motivated, frustrated or neutral"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"text": {"type": "string"}},
            "required": ["text"]
        })
    }

    fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: TextInput = parse_args(self.name(), args)?;
        to_output(&MoodOutput {
            mood: Mood::detect(&input.text),
        })
    }
}

/// Acknowledges a new study goal
#[derive(Debug, Clone, Copy, Default)]
pub struct SetGoalTool;

impl Tool for SetGoalTool {
    fn name(&self) -> &'static str {
        "set-goal"
    }

    fn description(&self) -> &'static str {
        "Record a study goal the learner wants to work towards"
    }

    fn parameters(&self) -> Value {
        goal_schema()
    }

    fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: GoalInput = parse_args(self.name(), args)?;
        to_output(&MessageOutput {
            message: format!(
                "Got it! I'll keep track of your goal to \"{}\". Let's check in on it later today. 💪",
                input.goal
            ),
        })
    }
}

/// Encourages progress on an existing goal
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckProgressTool;

impl Tool for CheckProgressTool {
    fn name(&self) -> &'static str {
        "check-progress"
    }

    fn description(&self) -> &'static str {
        "Check in on the learner's progress towards a goal"
    }

    fn parameters(&self) -> Value {
        goal_schema()
    }

    fn call(&self, args: Value) -> Result<Value, ToolError> {
        let input: GoalInput = parse_args(self.name(), args)?;
        to_output(&MessageOutput {
            message: format!(
                "You're making steady progress on \"{}\"! Want to reflect or set a new target?",
                input.goal
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_detection() {
        assert_eq!(Mood::detect("I'm so TIRED today"), Mood::Tired);
        assert_eq!(Mood::detect("feeling burnt out"), Mood::Tired);
        assert_eq!(Mood::detect("excited for the exam!"), Mood::Motivated);
        assert_eq!(Mood::detect("stuck on recursion"), Mood::Frustrated);
        assert_eq!(Mood::detect("what's next?"), Mood::Neutral);
    }

    #[test]
    fn test_analyze_mood_tool() {
        let out = AnalyzeMoodTool.call(json!({"text": "I'm frustrated"})).unwrap();
        assert_eq!(out, json!({"mood": "frustrated"}));
    }

    #[test]
    fn test_goal_tools() {
        let out = SetGoalTool.call(json!({"goal": "finish calculus"})).unwrap();
        assert!(out["message"].as_str().unwrap().contains("\"finish calculus\""));

        let out = CheckProgressTool.call(json!({"goal": "read 3 papers"})).unwrap();
        assert!(out["message"]
            .as_str()
            .unwrap()
            .starts_with("You're making steady progress"));
    }

    #[test]
    fn test_goal_required() {
        assert!(matches!(
            SetGoalTool.call(json!({})),
            Err(ToolError::InvalidInput { .. })
        ));
    }
}
