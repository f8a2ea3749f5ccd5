//! Error types for the update-info client.
//!
//! # Design
//! Each variant is one fault category a caller may want to react to
//! differently. "No eligible URL" is not here: it is a successful `None`
//! from the parse step. Non-2xx responses get their own variant with the raw
//! status and body, but count as transport faults (`is_transport`).

use thiserror::Error;

/// Errors returned by `UpdateClient` and the envelope/response codecs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request envelope could not be serialized. The shape is static, so
    /// this indicates a defect rather than bad input.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// The transport could not deliver the request or read the reply.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body is not XML of the expected shape.
    #[error("decoding failed: {0}")]
    Decoding(String),
}

impl ApiError {
    /// True for faults raised while talking to the server rather than while
    /// encoding or decoding documents.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Http { .. })
    }
}
