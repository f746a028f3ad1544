//! Stateless helper tools the agent can invoke during generation
//!
//! Every tool declares its input as a JSON schema, takes JSON arguments and
//! returns a JSON result. Tools share no state between invocations.

pub mod coach;
pub mod progress;
pub mod schedule;
pub mod session;

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use coach::{AnalyzeMoodTool, CheckProgressTool, SetGoalTool};
pub use progress::ProgressAssessmentTool;
pub use schedule::StudyScheduleTool;
pub use session::StudySessionTool;

/// Errors raised by tool invocations
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments did not match the declared input
    #[error("Invalid input for {tool}: {reason}")]
    InvalidInput { tool: String, reason: String },

    /// No tool registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Result could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    pub fn invalid_input(tool: &str, reason: impl Into<String>) -> Self {
        ToolError::InvalidInput {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }
}

/// A callable helper tool
pub trait Tool: Send + Sync {
    /// Unique tool name used in function declarations
    fn name(&self) -> &'static str;

    /// What the tool does, shown to the model
    fn description(&self) -> &'static str;

    /// JSON schema of the tool's arguments
    fn parameters(&self) -> Value;

    /// Run the tool
    fn call(&self, args: Value) -> Result<Value, ToolError>;
}

/// Deserialize tool arguments, treating null as an empty object
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolError::invalid_input(tool, e.to_string()))
}

pub(crate) fn to_output<T: Serialize>(output: &T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(output)?)
}

/// Ordered registry of the tools available to the agent
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    /// Create an empty tool set
    pub fn new() -> Self {
        Self::default()
    }

    /// All tools the study agent ships with
    pub fn standard() -> Self {
        Self::new()
            .with_tool(StudySessionTool)
            .with_tool(StudyScheduleTool)
            .with_tool(ProgressAssessmentTool)
            .with_tool(AnalyzeMoodTool)
            .with_tool(SetGoalTool)
            .with_tool(CheckProgressTool)
    }

    /// Register a tool
    pub fn with_tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Tools whose names appear in `eligible`; every tool when `None`
    pub fn eligible<'a>(&'a self, eligible: Option<&'a [String]>) -> impl Iterator<Item = &'a Arc<dyn Tool>> {
        self.tools.iter().filter(move |tool| match eligible {
            Some(names) => names.iter().any(|name| name == tool.name()),
            None => true,
        })
    }

    /// A new set holding only the eligible tools
    pub fn restricted(&self, eligible: Option<&[String]>) -> ToolSet {
        ToolSet {
            tools: self.eligible(eligible).cloned().collect(),
        }
    }

    /// Invoke a tool by name
    pub fn call(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.call(args)
    }

    /// Iterate over all registered tools
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|tool| tool.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_standard_toolset() {
        let tools = ToolSet::standard();
        assert_eq!(tools.len(), 6);
        assert!(tools.get("create-study-schedule").is_some());
        assert!(tools.get("log-study-session").is_some());
        assert!(tools.get("assess-progress").is_some());
        assert!(tools.get("missing").is_none());
    }

    #[test]
    fn test_eligible_filter() {
        let tools = ToolSet::standard();
        let names = vec!["assess-progress".to_string(), "nope".to_string()];

        let eligible: Vec<_> = tools.eligible(Some(names.as_slice())).map(|t| t.name()).collect();
        assert_eq!(eligible, vec!["assess-progress"]);

        assert_eq!(tools.eligible(None).count(), 6);
    }

    #[test]
    fn test_restricted_set() {
        let names = vec!["set-goal".to_string()];
        let restricted = ToolSet::standard().restricted(Some(names.as_slice()));

        assert_eq!(restricted.len(), 1);
        assert!(restricted.get("set-goal").is_some());
        assert!(restricted.call("analyze-mood", Value::Null).is_err());
    }

    #[test]
    fn test_call_unknown_tool() {
        let err = ToolSet::standard().call("teleport", json!({})).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "teleport"));
    }

    #[test]
    fn test_parameters_are_object_schemas() {
        for tool in ToolSet::standard().iter() {
            let schema = tool.parameters();
            assert_eq!(schema["type"], "object", "{} schema", tool.name());
            assert!(!tool.description().is_empty());
        }
    }
}
