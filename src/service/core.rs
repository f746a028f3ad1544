//! Core service answering `message/send`

use std::{
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};

use futures::future::BoxFuture;
use tower_service::Service;

use crate::{
    extract::extract_user_text,
    generator::{ConversationTurn, GenerateOptions, Generation, TurnGenerator},
    protocol::{error::A2AError, operation::A2AOperation, SendMessageParams, Task},
    service::{PriorTurn, ResponseBuilder},
};

/// Utterance used when no user text could be extracted
pub const GREETING_FALLBACK: &str = "Hello";

/// Reply used when the generator returns no text
pub const FALLBACK_REPLY: &str = "I received your message but couldn't generate a proper response.";

/// Upper bound on a single generation
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Core service: extraction, generation and task assembly
///
/// Receives validated operations from the validation layer. The generator
/// call is the only suspension point and is bounded by a timeout; any
/// generator failure is reported as an internal error.
#[derive(Clone)]
pub struct StudySyncService {
    generator: Arc<dyn TurnGenerator>,
    agent_name: String,
    timeout: Duration,
    options: GenerateOptions,
}

impl StudySyncService {
    /// Create the core service
    ///
    /// # Arguments
    ///
    /// * `generator` - Produces the agent replies
    /// * `agent_name` - Name used for the reply artifact
    pub fn new(generator: Arc<dyn TurnGenerator>, agent_name: impl Into<String>) -> Self {
        Self {
            generator,
            agent_name: agent_name.into(),
            timeout: DEFAULT_GENERATOR_TIMEOUT,
            options: GenerateOptions::default(),
        }
    }

    /// Bound the generator call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generation options passed on every call
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    async fn generate(&self, turns: &[ConversationTurn]) -> Result<Generation, A2AError> {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.generator.generate(turns, &self.options)).await;

        match outcome {
            Ok(Ok(generation)) => {
                tracing::debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    tool_results = generation.tool_results.len(),
                    "generation completed"
                );
                Ok(generation)
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "generation failed");
                Err(A2AError::internal(e))
            }
            Err(_) => {
                tracing::error!(timeout = ?self.timeout, "generation timed out");
                Err(A2AError::Timeout(self.timeout))
            }
        }
    }

    async fn send_message(self, params: SendMessageParams) -> Result<Task, A2AError> {
        let mut text = extract_user_text(&params);
        if text.is_empty() {
            tracing::debug!("no user text extracted, greeting instead");
            text = GREETING_FALLBACK.to_string();
        }

        let user_turn = ConversationTurn::user(text);
        let generation = self.generate(std::slice::from_ref(&user_turn)).await?;

        let reply = generation
            .text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        Ok(ResponseBuilder::new(&self.agent_name)
            .context_id(params.context_id())
            .task_id(params.task_id())
            .prior_turns([PriorTurn {
                turn: user_turn,
                message_id: params.message_id(),
            }])
            .tool_results(generation.tool_results)
            .build(reply))
    }
}

impl Service<A2AOperation> for StudySyncService {
    type Response = Task;
    type Error = A2AError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, operation: A2AOperation) -> Self::Future {
        let service = self.clone();

        Box::pin(async move {
            match operation {
                A2AOperation::SendMessage(params) => service.send_message(params).await,
            }
        })
    }
}

impl std::fmt::Debug for StudySyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudySyncService")
            .field("agent_name", &self.agent_name)
            .field("timeout", &self.timeout)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        generator::{GeneratorError, MockGenerator, MockTurnGenerator},
        protocol::Role,
    };

    fn send(params: Value) -> A2AOperation {
        A2AOperation::from_method("message/send", Some(params)).unwrap()
    }

    #[tokio::test]
    async fn test_reply_from_generator() {
        let mut generator = MockTurnGenerator::new();
        generator
            .expect_generate()
            .withf(|turns, _| turns.len() == 1 && turns[0].content == "I studied 25 minutes of math")
            .times(1)
            .returning(|_, _| Ok(Generation::text("Great job!").with_tool_result(json!({"duration": 25}))));

        let service = StudySyncService::new(Arc::new(generator), "studySyncAgent");
        let task = service
            .oneshot(send(json!({
                "contextId": "ctx1",
                "taskId": "task1",
                "message": {"role": "user", "messageId": "m-1", "parts": [{"kind": "text", "text": "I studied 25 minutes of math"}]}
            })))
            .await
            .unwrap();

        assert_eq!(task.id, "task1");
        assert_eq!(task.context_id, "ctx1");
        assert_eq!(task.reply_text(), Some("Great job!"));
        assert_eq!(task.artifacts[1].parts.len(), 1);
        assert_eq!(task.history[0].role, Role::User);
        assert_eq!(task.history[0].message_id.as_deref(), Some("m-1"));
    }

    #[tokio::test]
    async fn test_empty_message_greets() {
        let mut generator = MockTurnGenerator::new();
        generator
            .expect_generate()
            .withf(|turns, _| turns[0].content == "Hello")
            .times(1)
            .returning(|_, _| Ok(Generation::text("Hi there!")));

        let service = StudySyncService::new(Arc::new(generator), "studySyncAgent");
        let task = service
            .oneshot(send(json!({"message": {"parts": []}})))
            .await
            .unwrap();

        assert_eq!(task.history[0].text(), "Hello");
    }

    #[tokio::test]
    async fn test_blank_reply_uses_fallback() {
        let service = StudySyncService::new(Arc::new(MockGenerator::reply("   ")), "studySyncAgent");
        let task = service.oneshot(send(json!({"text": "hey"}))).await.unwrap();
        assert_eq!(task.reply_text(), Some(FALLBACK_REPLY));
    }

    #[tokio::test]
    async fn test_generator_failure_is_internal() {
        let mut generator = MockTurnGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(GeneratorError::RateLimited));

        let service = StudySyncService::new(Arc::new(generator), "studySyncAgent");
        let err = service.oneshot(send(json!({"text": "hey"}))).await.unwrap_err();

        assert_eq!(err.code(), -32603);
        assert_eq!(err.data(), Some(json!({"details": "Rate limit exceeded"})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_timeout() {
        let generator = MockGenerator::reply("late").with_delay(Duration::from_secs(60));
        let service = StudySyncService::new(Arc::new(generator), "studySyncAgent")
            .with_timeout(Duration::from_secs(5));

        let err = service.oneshot(send(json!({"text": "hey"}))).await.unwrap_err();
        assert!(matches!(err, A2AError::Timeout(_)));
        assert_eq!(err.code(), -32603);
        assert_eq!(err.http_status(), 500);
    }
}
