//! Serialization codecs for the A2A protocol binding

pub mod jsonrpc;

pub use jsonrpc::{JsonRpcCodec, JsonRpcError, JsonRpcRequest, JsonRpcResponse};

use crate::protocol::error::A2AError;
use bytes::Bytes;

/// Codec trait for decoding inbound A2A requests and encoding replies
///
/// The server speaks the JSON-RPC binding only, but the handler talks to
/// the codec through this trait so the binding stays swappable.
pub trait Codec: Send + Sync {
    /// Deserialize a request body into an envelope
    ///
    /// # Arguments
    ///
    /// * `body` - The raw request body
    ///
    /// # Returns
    ///
    /// The decoded envelope, or [`A2AError::Parse`] if the body is not JSON
    fn decode_request(&self, body: &[u8]) -> Result<JsonRpcRequest, A2AError>;

    /// Serialize a reply envelope to bytes for transport
    fn encode_response(&self, response: &JsonRpcResponse) -> Result<Bytes, A2AError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &str;
}
