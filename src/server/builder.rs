//! Server builder assembling the service stack

use std::{sync::Arc, time::Duration};

use tower::ServiceBuilder;

use crate::{
    agent::StudySyncAgent,
    protocol::AgentCard,
    codec::{Codec, JsonRpcCodec},
    generator::{GeminiGenerator, GenerateOptions, MockGenerator, TurnGenerator},
    layer::A2AValidationLayer,
    server::ServerConfig,
    service::{StudySyncService, DEFAULT_GENERATOR_TIMEOUT},
    tools::ToolSet,
    transport::{AgentService, HttpServer},
};

/// Builder for the A2A server
///
/// Wires the core service behind the validation layer and hands the stack
/// to the HTTP transport.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use studysync_a2a::prelude::*;
///
/// # async fn example() -> std::io::Result<()> {
/// let server = A2AServerBuilder::new(Arc::new(MockGenerator::offline()))
///     .with_base_url("http://localhost:4111")
///     .build();
///
/// server.serve("127.0.0.1:4111".parse().unwrap()).await
/// # }
/// ```
pub struct A2AServerBuilder {
    generator: Arc<dyn TurnGenerator>,
    agent: StudySyncAgent,
    tools: Arc<ToolSet>,
    codec: Arc<dyn Codec>,
    timeout: Duration,
    options: GenerateOptions,
    base_url: String,
}

impl A2AServerBuilder {
    /// Start a builder around a turn generator
    pub fn new(generator: Arc<dyn TurnGenerator>) -> Self {
        Self {
            generator,
            agent: StudySyncAgent::default(),
            tools: Arc::new(ToolSet::standard()),
            codec: Arc::new(JsonRpcCodec::new()),
            timeout: DEFAULT_GENERATOR_TIMEOUT,
            options: GenerateOptions::default(),
            base_url: String::new(),
        }
    }

    /// Build everything from a server configuration
    ///
    /// Uses Gemini when it is configured, the offline generator otherwise.
    pub fn from_config(config: &ServerConfig) -> Self {
        let agent = StudySyncAgent::named(&config.agent_name);
        let tools = Arc::new(ToolSet::standard());

        let generator: Arc<dyn TurnGenerator> = match &config.gemini {
            Some(gemini) => {
                tracing::info!(model = %gemini.model, "using Gemini turn generator");
                Arc::new(GeminiGenerator::new(gemini.clone(), agent.clone(), tools.clone()))
            }
            None => {
                tracing::warn!(
                    "GOOGLE_GENERATIVE_AI_API_KEY is not set, replies come from the offline generator"
                );
                Arc::new(MockGenerator::offline())
            }
        };

        let mut builder = Self::new(generator)
            .with_agent(agent)
            .with_tools(tools)
            .with_timeout(config.generator_timeout)
            .with_base_url(config.base_url());
        if let Some(names) = &config.enabled_tools {
            builder = builder.with_options(GenerateOptions::default().with_tools(names.clone()));
        }
        builder
    }

    /// Serve a different agent definition
    pub fn with_agent(mut self, agent: StudySyncAgent) -> Self {
        self.agent = agent;
        self
    }

    /// Tools advertised in the agent card
    pub fn with_tools(mut self, tools: Arc<ToolSet>) -> Self {
        self.tools = tools;
        self
    }

    /// Use a custom codec
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    /// Bound each generation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Options passed to every generation
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Externally reachable base URL for the agent card
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Assemble the validation layer and core service
    pub fn build_service(&self) -> AgentService {
        let core = StudySyncService::new(self.generator.clone(), &self.agent.name)
            .with_timeout(self.timeout)
            .with_options(self.options.clone());

        ServiceBuilder::new()
            .layer(A2AValidationLayer::new(&self.agent.name))
            .service(core)
    }

    /// Agent card advertising the tools the model may call
    pub fn card(&self) -> AgentCard {
        let advertised = self.tools.restricted(self.options.tools.as_deref());
        self.agent.card(&self.base_url, &advertised)
    }

    /// Build the HTTP server
    pub fn build(self) -> HttpServer {
        let card = self.card();
        HttpServer::new(self.build_service(), card, self.agent.endpoint_path())
            .with_codec(self.codec)
    }
}
