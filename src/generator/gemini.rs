//! Gemini `generateContent` client with a function-calling loop

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use super::{ConversationTurn, GenerateOptions, Generation, GeneratorError, TurnGenerator};
use crate::{agent::StudySyncAgent, protocol::Role, tools::ToolSet};

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default Generative Language API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

const DEFAULT_MAX_TOOL_ROUNDS: usize = 4;

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,

    /// Model round trips allowed to resolve tool calls
    pub max_tool_rounds: usize,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API root; a trailing slash is added when missing
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    fn endpoint(&self) -> Result<Url, GeneratorError> {
        Ok(Url::parse(&self.base_url)?.join(&format!("models/{}:generateContent", self.model))?)
    }
}

/// A function call requested by the model
#[derive(Debug, Clone, PartialEq)]
struct FunctionCall {
    name: String,
    args: Value,
}

/// First candidate of a `generateContent` answer
#[derive(Debug, Default)]
struct CandidateReply {
    parts: Vec<Value>,
    text: Option<String>,
    calls: Vec<FunctionCall>,
}

/// Turn generator backed by Gemini
///
/// Sends the agent instructions as `systemInstruction` and the eligible tools
/// as function declarations. When the model answers with function calls the
/// tools run locally and their outputs are sent back as `functionResponse`
/// parts, until the model answers with text or the round limit is hit.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
    agent: StudySyncAgent,
    tools: Arc<ToolSet>,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig, agent: StudySyncAgent, tools: Arc<ToolSet>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            agent,
            tools,
        }
    }

    /// Use a preconfigured HTTP client
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn declarations(&self, options: &GenerateOptions) -> Vec<Value> {
        self.tools
            .eligible(options.tools.as_deref())
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.parameters(),
                })
            })
            .collect()
    }

    fn payload(&self, contents: &[Value], declarations: &[Value]) -> Value {
        let mut payload = json!({
            "contents": contents,
            "systemInstruction": {"parts": [{"text": self.agent.instructions}]},
            "generationConfig": {
                "temperature": self.agent.temperature,
                "topP": self.agent.top_p,
                "maxOutputTokens": self.agent.max_output_tokens,
            },
        });
        if !declarations.is_empty() {
            payload["tools"] = json!([{"function_declarations": declarations}]);
        }
        payload
    }

    async fn send(&self, payload: &Value) -> Result<Value, GeneratorError> {
        let response = self
            .client
            .post(self.config.endpoint()?)
            .header("x-goog-api-key", &self.config.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status.as_u16() {
                401 | 403 => GeneratorError::Auth,
                429 => GeneratorError::RateLimited,
                code => GeneratorError::Status { status: code, body },
            });
        }

        let body: Value = response.json().await?;
        if let Some(error) = body.get("error") {
            return Err(GeneratorError::MalformedResponse(format!("API error: {error}")));
        }
        Ok(body)
    }

    /// Run the eligible tool, shaping its outcome as a `functionResponse` part
    fn run_tool(&self, call: FunctionCall, eligible: &[&str], results: &mut Vec<Value>) -> Value {
        let outcome = if eligible.contains(&call.name.as_str()) {
            self.tools.call(&call.name, call.args)
        } else {
            Err(crate::tools::ToolError::UnknownTool(call.name.clone()))
        };

        let response = match outcome {
            Ok(output) => {
                tracing::debug!(tool = %call.name, "tool call succeeded");
                results.push(output.clone());
                json!({"name": call.name, "content": output})
            }
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "tool call failed");
                json!({"name": call.name, "error": e.to_string()})
            }
        };

        json!({"functionResponse": {"name": call.name, "response": response}})
    }
}

impl std::fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .field("tools", &self.tools)
            .finish()
    }
}

#[async_trait]
impl TurnGenerator for GeminiGenerator {
    async fn generate(
        &self,
        turns: &[ConversationTurn],
        options: &GenerateOptions,
    ) -> Result<Generation, GeneratorError> {
        let declarations = self.declarations(options);
        let eligible: Vec<&str> = self
            .tools
            .eligible(options.tools.as_deref())
            .map(|tool| tool.name())
            .collect();

        let mut contents: Vec<Value> = turns.iter().map(turn_content).collect();
        let mut tool_results = Vec::new();

        for round in 0..=self.config.max_tool_rounds {
            let body = self.send(&self.payload(&contents, &declarations)).await?;
            let reply = parse_candidate(&body)?;

            if reply.calls.is_empty() {
                tracing::debug!(round, tools = tool_results.len(), "generation finished");
                return Ok(Generation {
                    text: reply.text,
                    tool_results,
                });
            }

            if round == self.config.max_tool_rounds {
                tracing::warn!(round, calls = reply.calls.len(), "tool round limit reached");
                break;
            }

            tracing::debug!(round, calls = reply.calls.len(), "model requested tools");
            let responses: Vec<Value> = reply
                .calls
                .into_iter()
                .map(|call| self.run_tool(call, &eligible, &mut tool_results))
                .collect();

            contents.push(json!({"role": "model", "parts": reply.parts}));
            contents.push(json!({"role": "user", "parts": responses}));
        }

        Err(GeneratorError::ToolLoopExceeded(self.config.max_tool_rounds))
    }
}

fn turn_content(turn: &ConversationTurn) -> Value {
    let role = match turn.role {
        Role::User => "user",
        Role::Agent => "model",
    };
    json!({"role": role, "parts": [{"text": turn.content}]})
}

fn parse_candidate(body: &Value) -> Result<CandidateReply, GeneratorError> {
    let candidate = body
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .ok_or_else(|| GeneratorError::MalformedResponse("no candidates in response".into()))?;

    // A blocked candidate carries no content
    let parts = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut text = String::new();
    let mut calls = Vec::new();
    for part in &parts {
        if part.get("thought").and_then(Value::as_bool) == Some(true) {
            continue;
        }
        if let Some(t) = part.get("text").and_then(Value::as_str) {
            text.push_str(t);
        }
        if let Some(call) = part.get("functionCall") {
            let name = call
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| GeneratorError::MalformedResponse("functionCall without name".into()))?;
            calls.push(FunctionCall {
                name: name.to_string(),
                args: call.get("args").cloned().unwrap_or(Value::Null),
            });
        }
    }

    let text = text.trim();
    Ok(CandidateReply {
        parts,
        text: (!text.is_empty()).then(|| text.to_string()),
        calls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("key");
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );

        let config = GeminiConfig::new("key")
            .with_model("gemini-1.5-pro")
            .with_base_url("http://127.0.0.1:9000/v1beta");
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://127.0.0.1:9000/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_turn_roles_map_to_gemini() {
        assert_eq!(turn_content(&ConversationTurn::user("hi"))["role"], "user");
        assert_eq!(turn_content(&ConversationTurn::agent("hey"))["role"], "model");
        assert_eq!(
            turn_content(&ConversationTurn::user("hi"))["parts"][0]["text"],
            "hi"
        );
    }

    #[test]
    fn test_payload_shape() {
        let generator = GeminiGenerator::new(
            GeminiConfig::new("key"),
            StudySyncAgent::default(),
            Arc::new(ToolSet::standard()),
        );
        let options = GenerateOptions::default().with_tools(vec!["assess-progress".into()]);
        let declarations = generator.declarations(&options);
        let payload = generator.payload(&[turn_content(&ConversationTurn::user("hi"))], &declarations);

        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 512);
        assert!(payload["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("StudySync"));
        let declared = payload["tools"][0]["function_declarations"].as_array().unwrap();
        assert_eq!(declared.len(), 1);
        assert_eq!(declared[0]["name"], "assess-progress");
    }

    #[test]
    fn test_no_tools_omits_declarations() {
        let generator = GeminiGenerator::new(
            GeminiConfig::new("key"),
            StudySyncAgent::default(),
            Arc::new(ToolSet::new()),
        );
        let payload = generator.payload(&[], &generator.declarations(&GenerateOptions::default()));
        assert!(payload.get("tools").is_none());
    }

    #[test]
    fn test_parse_text_candidate() {
        let body = json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Nice "}, {"text": "work!"}]}}]
        });
        let reply = parse_candidate(&body).unwrap();
        assert_eq!(reply.text.as_deref(), Some("Nice work!"));
        assert!(reply.calls.is_empty());
    }

    #[test]
    fn test_parse_function_call() {
        let body = json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"functionCall": {"name": "log-study-session", "args": {"subject": "Math", "duration": 25}}}
            ]}}]
        });
        let reply = parse_candidate(&body).unwrap();
        assert!(reply.text.is_none());
        assert_eq!(
            reply.calls,
            vec![FunctionCall {
                name: "log-study-session".into(),
                args: json!({"subject": "Math", "duration": 25}),
            }]
        );
    }

    #[test]
    fn test_parse_blocked_candidate() {
        let body = json!({"candidates": [{"finishReason": "SAFETY"}]});
        let reply = parse_candidate(&body).unwrap();
        assert!(reply.text.is_none());
        assert!(reply.calls.is_empty());
    }

    #[test]
    fn test_parse_missing_candidates() {
        assert!(matches!(
            parse_candidate(&json!({})),
            Err(GeneratorError::MalformedResponse(_))
        ));
    }
}
