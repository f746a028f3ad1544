//! Server configuration

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use thiserror::Error;

use crate::{agent::AGENT_NAME, generator::GeminiConfig, service::DEFAULT_GENERATOR_TIMEOUT};

/// Port the server listens on by default
pub const DEFAULT_PORT: u16 = 4111;

/// Invalid configuration value
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid value {value:?} for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    fn new(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Configuration for the A2A server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: IpAddr,

    /// Port to bind
    pub port: u16,

    /// Name the agent is served under
    pub agent_name: String,

    /// Upper bound on one generation
    pub generator_timeout: Duration,

    /// Externally reachable base URL, used in the agent card
    pub public_url: Option<String>,

    /// Tools the model may call; all when `None`
    pub enabled_tools: Option<Vec<String>>,

    /// Gemini settings; the offline generator is used when `None`
    pub gemini: Option<GeminiConfig>,
}

impl ServerConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            agent_name: AGENT_NAME.to_string(),
            generator_timeout: DEFAULT_GENERATOR_TIMEOUT,
            public_url: None,
            enabled_tools: None,
            gemini: None,
        }
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through a variable lookup
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::new();

        if let Some(port) = get("PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::new("PORT", &port, e))?;
        }
        if let Some(host) = get("HOST") {
            config.host = host
                .parse()
                .map_err(|e| ConfigError::new("HOST", &host, e))?;
        }
        if let Some(name) = get("STUDYSYNC_AGENT_NAME") {
            if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                return Err(ConfigError::new(
                    "STUDYSYNC_AGENT_NAME",
                    &name,
                    "only letters, digits, '-' and '_' are allowed",
                ));
            }
            config.agent_name = name;
        }
        if let Some(secs) = get("STUDYSYNC_GENERATOR_TIMEOUT_SECS") {
            let parsed: u64 = secs
                .parse()
                .map_err(|e| ConfigError::new("STUDYSYNC_GENERATOR_TIMEOUT_SECS", &secs, e))?;
            if parsed == 0 {
                return Err(ConfigError::new(
                    "STUDYSYNC_GENERATOR_TIMEOUT_SECS",
                    &secs,
                    "must be greater than 0",
                ));
            }
            config.generator_timeout = Duration::from_secs(parsed);
        }
        config.public_url = get("STUDYSYNC_PUBLIC_URL");
        config.enabled_tools = get("STUDYSYNC_TOOLS").map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        });

        if let Some(api_key) = get("GOOGLE_GENERATIVE_AI_API_KEY") {
            let mut gemini = GeminiConfig::new(api_key);
            if let Some(model) = get("STUDYSYNC_MODEL") {
                gemini = gemini.with_model(model);
            }
            if let Some(base_url) = get("GEMINI_BASE_URL") {
                url::Url::parse(&base_url)
                    .map_err(|e| ConfigError::new("GEMINI_BASE_URL", &base_url, e))?;
                gemini = gemini.with_base_url(base_url);
            }
            config.gemini = Some(gemini);
        }

        Ok(config)
    }

    /// Set the bind address
    pub fn with_addr(mut self, host: IpAddr, port: u16) -> Self {
        self.host = host;
        self.port = port;
        self
    }

    /// Set the agent name
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    /// Set the generator timeout
    pub fn with_generator_timeout(mut self, timeout: Duration) -> Self {
        self.generator_timeout = timeout;
        self
    }

    /// Set the externally reachable base URL
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }

    /// Use Gemini for generation
    pub fn with_gemini(mut self, gemini: GeminiConfig) -> Self {
        self.gemini = Some(gemini);
        self
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Base URL advertised in the agent card
    pub fn base_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
