//! HTTP binding of the A2A endpoint
//!
//! Serves `POST /a2a/agent/:agent_id` with the JSON-RPC binding, the agent
//! card under `/.well-known/agent-card.json` and a static health report.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use crate::{
    codec::{Codec, JsonRpcCodec, JsonRpcResponse},
    layer::A2AValidationService,
    protocol::{error::A2AError, AgentCard, Task},
    service::{A2ARequest, StudySyncService},
};

/// The service stack behind the agent endpoint
pub type AgentService = A2AValidationService<StudySyncService>;

/// State shared across all routes
#[derive(Clone)]
pub struct AppState {
    service: AgentService,
    codec: Arc<dyn Codec>,
    card: Arc<AgentCard>,
    endpoint: Arc<str>,
}

impl AppState {
    /// Encode a handler outcome as a JSON-RPC reply
    fn reply(&self, id: Value, result: Result<Task, A2AError>) -> Response {
        let (status, envelope) = match result.and_then(|task| JsonRpcResponse::success(id.clone(), &task)) {
            Ok(envelope) => (StatusCode::OK, envelope),
            Err(e) => {
                tracing::warn!(code = e.code(), error = %e, "a2a request failed");
                let status =
                    StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, JsonRpcResponse::error(id, &e))
            }
        };

        match self.codec.encode_response(&envelope) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, self.codec.content_type().to_string())],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode reply");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// HTTP server hosting a single agent
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    /// Create a server for the given service stack and agent card
    ///
    /// # Arguments
    ///
    /// * `service` - Validation layer wrapping the core service
    /// * `card` - Card advertised at `/.well-known/agent-card.json`
    /// * `endpoint` - Path of the agent endpoint, reported by the health route
    pub fn new(service: AgentService, card: AgentCard, endpoint: impl Into<String>) -> Self {
        Self {
            state: AppState {
                service,
                codec: Arc::new(JsonRpcCodec::new()),
                card: Arc::new(card),
                endpoint: Arc::from(endpoint.into()),
            },
        }
    }

    /// Use a different wire codec
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.state.codec = codec;
        self
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(health))
            .route("/health", get(health))
            .route("/.well-known/agent-card.json", get(agent_card))
            .route("/a2a/agent/:agent_id", post(message_send))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Bind to `addr` and serve until the process stops
    pub async fn serve(self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            %local_addr,
            agent = %self.state.card.name,
            endpoint = %self.state.endpoint,
            "A2A server listening"
        );

        axum::serve(listener, self.router()).await
    }
}

/// Handler for `message/send`
async fn message_send(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    body: Bytes,
) -> Response {
    tracing::info!(%agent_id, bytes = body.len(), "a2a request received");

    let envelope = match state.codec.decode_request(&body) {
        Ok(envelope) => envelope,
        Err(e) => return state.reply(Value::Null, Err(e)),
    };

    let id = envelope.reply_id();
    let result = state
        .service
        .clone()
        .oneshot(A2ARequest::new(agent_id, envelope))
        .await;

    state.reply(id, result)
}

async fn agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "StudySync A2A Agent",
        "message": format!("{} is running", state.card.name),
        "timestamp": Utc::now().to_rfc3339(),
        "endpoint": state.endpoint.as_ref(),
    }))
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("agent", &self.state.card.name)
            .field("endpoint", &self.state.endpoint)
            .finish()
    }
}
