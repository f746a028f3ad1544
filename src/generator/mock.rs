//! Scripted turn generator for offline runs and tests

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use super::{ConversationTurn, GenerateOptions, Generation, GeneratorError, TurnGenerator};

type Handler = dyn Fn(&[ConversationTurn]) -> Result<Generation, GeneratorError> + Send + Sync;

/// Scripted turn generator
///
/// Answers every generation with a caller-supplied handler and remembers the
/// turns it was given. Used when no model credentials are configured and to
/// drive the service without a network connection.
#[derive(Clone)]
pub struct MockGenerator {
    handler: Arc<Handler>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<Vec<ConversationTurn>>>>,
}

impl MockGenerator {
    /// Create a generator with a custom reply handler
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&[ConversationTurn]) -> Result<Generation, GeneratorError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always reply with the same text
    pub fn reply(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(Generation::text(text.clone())))
    }

    /// Always fail with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |_| Err(GeneratorError::Other(message.clone())))
    }

    /// Canned coaching replies for running without a model
    pub fn offline() -> Self {
        Self::new(|turns| {
            let last = turns.last().map(|turn| turn.content.as_str()).unwrap_or_default();
            Ok(Generation::text(format!(
                "I'm running in offline mode, but I heard you: \"{}\". What are you studying today?",
                last
            )))
        })
    }

    /// Wait before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Turn lists received so far, oldest first
    pub fn calls(&self) -> Vec<Vec<ConversationTurn>> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Content of the last turn of the most recent generation
    pub fn last_user_text(&self) -> Option<String> {
        self.calls()
            .last()
            .and_then(|turns| turns.last())
            .map(|turn| turn.content.clone())
    }
}

#[async_trait]
impl TurnGenerator for MockGenerator {
    async fn generate(
        &self,
        turns: &[ConversationTurn],
        _options: &GenerateOptions,
    ) -> Result<Generation, GeneratorError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(turns.to_vec());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(turns)
    }
}

impl std::fmt::Debug for MockGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGenerator")
            .field("delay", &self.delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_turns() {
        let generator = MockGenerator::reply("Great job!");
        let generation = generator
            .generate(&[ConversationTurn::user("I studied")], &GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(generation.text.as_deref(), Some("Great job!"));
        assert_eq!(generator.calls().len(), 1);
        assert_eq!(generator.last_user_text().as_deref(), Some("I studied"));
    }

    #[tokio::test]
    async fn test_failing() {
        let generator = MockGenerator::failing("model down");
        let err = generator
            .generate(&[ConversationTurn::user("hi")], &GenerateOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "model down");
    }

    #[tokio::test]
    async fn test_offline_echoes_last_turn() {
        let generation = MockGenerator::offline()
            .generate(&[ConversationTurn::user("calculus")], &GenerateOptions::default())
            .await
            .unwrap();
        assert!(generation.text.unwrap().contains("\"calculus\""));
    }
}
