//! Turn generation: the boundary to the language model
//!
//! The core hands an ordered list of role-tagged turns to a [`TurnGenerator`]
//! and gets back reply text plus the results of any tools the model invoked.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::Role;

pub use gemini::{GeminiConfig, GeminiGenerator};
pub use mock::MockGenerator;

/// One normalized conversation turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
        }
    }
}

/// Per-call generation options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateOptions {
    /// Names of the tools the model may invoke; `None` allows every tool
    pub tools: Option<Vec<String>>,
}

impl GenerateOptions {
    /// Restrict the eligible tools
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = Some(tools);
        self
    }
}

/// Output of one generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    /// Reply text; `None` when the model produced no text
    pub text: Option<String>,

    /// Outputs of the tools invoked while generating, in call order
    pub tool_results: Vec<Value>,
}

impl Generation {
    /// A plain text reply without tool use
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_results: Vec::new(),
        }
    }

    /// Attach a tool result
    pub fn with_tool_result(mut self, result: Value) -> Self {
        self.tool_results.push(result);
        self
    }
}

/// Errors raised while generating a turn
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Network or decoding failure talking to the provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider endpoint could not be built
    #[error("Invalid provider URL: {0}")]
    Url(#[from] url::ParseError),

    /// Provider rejected the credentials
    #[error("Authentication rejected by the model provider")]
    Auth,

    /// Provider quota or rate limit hit
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Provider answered with a non-success status
    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider answer did not have the expected shape
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// The model kept calling tools past the round limit
    #[error("Tool loop exceeded {0} rounds")]
    ToolLoopExceeded(usize),

    /// Any other failure
    #[error("{0}")]
    Other(String),
}

/// Produces the agent's reply for a conversation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TurnGenerator: Send + Sync {
    /// Generate a reply to the last turn
    ///
    /// # Arguments
    ///
    /// * `turns` - Conversation so far, ending with the new user turn
    /// * `options` - Which tools may be invoked
    async fn generate(
        &self,
        turns: &[ConversationTurn],
        options: &GenerateOptions,
    ) -> Result<Generation, GeneratorError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_generation_builders() {
        let generation = Generation::text("Nice!").with_tool_result(json!({"duration": 25}));
        assert_eq!(generation.text.as_deref(), Some("Nice!"));
        assert_eq!(generation.tool_results, vec![json!({"duration": 25})]);
    }

    #[test]
    fn test_turn_roles() {
        assert_eq!(ConversationTurn::user("hi").role, Role::User);
        assert_eq!(ConversationTurn::agent("hello").role, Role::Agent);
    }

    #[test]
    fn test_options() {
        let options = GenerateOptions::default().with_tools(vec!["assess-progress".into()]);
        assert_eq!(options.tools.as_deref(), Some(&["assess-progress".to_string()][..]));
        assert!(GenerateOptions::default().tools.is_none());
    }
}
