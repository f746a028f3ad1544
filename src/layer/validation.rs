//! Validation layer for inbound JSON-RPC envelopes

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;

use crate::{
    codec::jsonrpc::JSONRPC_VERSION,
    protocol::{
        error::A2AError,
        operation::{A2AOperation, SEND_MESSAGE_METHOD},
        task::Task,
    },
    service::A2ARequest,
};

/// Layer that validates envelopes and routes them to the hosted agent
///
/// The wrapped service only ever sees typed operations addressed to the
/// agent this layer was built for.
#[derive(Clone, Debug)]
pub struct A2AValidationLayer {
    agent_name: String,
}

impl A2AValidationLayer {
    /// Create a validation layer for the named agent
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
        }
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService {
            inner,
            agent_name: self.agent_name.clone(),
        }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone, Debug)]
pub struct A2AValidationService<S> {
    inner: S,
    agent_name: String,
}

impl<S> A2AValidationService<S> {
    /// Check an inbound request and turn it into an operation
    ///
    /// Checks run in order and the first failure wins: envelope version and
    /// id, method, agent identifier, then the params shape.
    fn validate_request(&self, req: A2ARequest) -> Result<A2AOperation, A2AError> {
        let envelope = req.envelope;

        if envelope.jsonrpc.as_deref() != Some(JSONRPC_VERSION) || envelope.id.is_none() {
            return Err(A2AError::InvalidRequest);
        }

        let method = envelope.method.unwrap_or_default();
        if method != SEND_MESSAGE_METHOD {
            return Err(A2AError::MethodNotSupported {
                method,
                supported: SEND_MESSAGE_METHOD,
            });
        }

        if req.agent_id != self.agent_name {
            return Err(A2AError::AgentNotFound {
                agent_id: req.agent_id,
                available: self.agent_name.clone(),
            });
        }

        A2AOperation::from_method(&method, envelope.params)
    }
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
where
    S: Service<A2AOperation, Response = Task, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Task;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let operation = match self.validate_request(req) {
            Ok(operation) => operation,
            Err(e) => {
                tracing::debug!(code = e.code(), error = %e, "request rejected");
                return Box::pin(async move { Err(e) });
            }
        };

        let mut inner = self.inner.clone();
        // the clone may not be ready; swap so the readied instance is called
        std::mem::swap(&mut self.inner, &mut inner);
        Box::pin(async move { inner.call(operation).await })
    }
}
