//! Integration tests for the Gemini turn generator using wiremock.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use serde_json::{json, Value};
use studysync_a2a::{
    agent::StudySyncAgent,
    generator::{ConversationTurn, GeminiConfig, GeminiGenerator, GenerateOptions, GeneratorError, TurnGenerator},
    tools::{Tool, ToolError, ToolSet},
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn generator(server: &MockServer) -> GeminiGenerator {
    let config = GeminiConfig::new("test-api-key").with_base_url(format!("{}/v1beta", server.uri()));
    GeminiGenerator::new(config, StudySyncAgent::default(), Arc::new(ToolSet::standard()))
}

fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20}
    })
}

fn call_response(name: &str, args: Value) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"functionCall": {"name": name, "args": args}}]},
            "finishReason": "STOP"
        }]
    })
}

/// Tool that counts how often it runs
struct CountingTool(Arc<AtomicUsize>);

impl Tool for CountingTool {
    fn name(&self) -> &'static str {
        "count-calls"
    }

    fn description(&self) -> &'static str {
        "Counts invocations"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn call(&self, _args: Value) -> Result<Value, ToolError> {
        let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(json!({"count": n}))
    }
}

fn user(text: &str) -> Vec<ConversationTurn> {
    vec![ConversationTurn::user(text)]
}

#[tokio::test]
async fn generate_sends_key_instructions_and_settings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-api-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "I'm tired of revising"}]}],
            "generationConfig": {"maxOutputTokens": 512}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Take a short break, you earned it!")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generation = generator(&mock_server)
        .generate(&user("I'm tired of revising"), &GenerateOptions::default())
        .await
        .unwrap();

    assert_eq!(generation.text.as_deref(), Some("Take a short break, you earned it!"));
    assert!(generation.tool_results.is_empty());
}

#[tokio::test]
async fn generate_runs_requested_tool() {
    let mock_server = MockServer::start().await;

    // the follow-up round carries the tool output back to the model
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "user"},
                {"role": "model"},
                {"role": "user", "parts": [{"functionResponse": {"name": "assess-progress"}}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Good progress! Focus on genetics next.")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(call_response(
            "assess-progress",
            json!({"subject": "Biology", "confidence": 6, "topicsMastered": ["cells"], "topicsStruggling": ["genetics"]}),
        )))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    let generation = generator(&mock_server)
        .generate(&user("How am I doing in biology?"), &GenerateOptions::default())
        .await
        .unwrap();

    assert_eq!(generation.text.as_deref(), Some("Good progress! Focus on genetics next."));
    assert_eq!(generation.tool_results.len(), 1);
    assert_eq!(generation.tool_results[0]["assessment"], "Good progress, keep going!");
    assert_eq!(generation.tool_results[0]["recommendation"], "Focus on genetics");
}

#[tokio::test]
async fn failing_tool_is_reported_but_not_recorded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "user"},
                {"role": "model"},
                {"role": "user", "parts": [{"functionResponse": {"name": "log-study-session", "response": {"name": "log-study-session"}}}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("How long did you study?")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(call_response(
            "log-study-session",
            json!({"subject": "Math", "duration": 0, "topics": []}),
        )))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let generation = generator(&mock_server)
        .generate(&user("log my math session"), &GenerateOptions::default())
        .await
        .unwrap();

    assert_eq!(generation.text.as_deref(), Some("How long did you study?"));
    assert!(generation.tool_results.is_empty());
}

#[tokio::test]
async fn only_eligible_tools_are_declared() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "tools": [{"function_declarations": [{"name": "set-goal"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("Goal noted!")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = GenerateOptions::default().with_tools(vec!["set-goal".to_string()]);
    let generation = generator(&mock_server)
        .generate(&user("I want to finish chapter 3"), &options)
        .await
        .unwrap();

    assert_eq!(generation.text.as_deref(), Some("Goal noted!"));
}

#[tokio::test]
async fn tool_loop_is_bounded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(call_response(
            "analyze-mood",
            json!({"text": "meh"}),
        )))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = GeminiConfig::new("test-api-key")
        .with_base_url(format!("{}/v1beta", mock_server.uri()))
        .with_max_tool_rounds(2);
    let generator = GeminiGenerator::new(config, StudySyncAgent::default(), Arc::new(ToolSet::standard()));

    let err = generator
        .generate(&user("meh"), &GenerateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GeneratorError::ToolLoopExceeded(2)));
}

#[tokio::test]
async fn tools_run_at_most_max_rounds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(call_response("count-calls", json!({}))))
        .expect(2)
        .mount(&mock_server)
        .await;

    let executions = Arc::new(AtomicUsize::new(0));
    let config = GeminiConfig::new("test-api-key")
        .with_base_url(format!("{}/v1beta", mock_server.uri()))
        .with_max_tool_rounds(1);
    let tools = ToolSet::new().with_tool(CountingTool(executions.clone()));
    let generator = GeminiGenerator::new(config, StudySyncAgent::default(), Arc::new(tools));

    let err = generator
        .generate(&user("count"), &GenerateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GeneratorError::ToolLoopExceeded(1)));
    assert_eq!(executions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn http_errors_are_classified() {
    for status in [401u16, 429, 503] {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = generator(&mock_server)
            .generate(&user("hi"), &GenerateOptions::default())
            .await
            .unwrap_err();

        match status {
            401 => assert!(matches!(err, GeneratorError::Auth), "{err:?}"),
            429 => assert!(matches!(err, GeneratorError::RateLimited), "{err:?}"),
            _ => assert!(
                matches!(err, GeneratorError::Status { status: 503, ref body } if body == "upstream says no"),
                "{err:?}"
            ),
        }
    }
}

#[tokio::test]
async fn error_body_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid"}
        })))
        .mount(&mock_server)
        .await;

    let err = generator(&mock_server)
        .generate(&user("hi"), &GenerateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GeneratorError::MalformedResponse(_)));
}
