//! Error types surfaced by route guide calls.

use thiserror::Error;

/// Failure of a single RPC call.
///
/// Every variant aborts the call that produced it. Nothing is retried.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The caller's request stream broke before end-of-stream.
    #[error("Inbound stream failed: {0}")]
    Inbound(String),

    /// The response stream to the caller could not be written.
    #[error("Outbound stream failed: {0}")]
    Outbound(String),

    /// A message did not decode as the expected type.
    #[error("Malformed message: {0}")]
    Decode(#[from] serde_json::Error),

    /// A streamed line exceeded the accepted length.
    #[error("Line longer than {0} bytes")]
    LineTooLong(usize),
}

impl RpcError {
    pub fn inbound(err: impl std::fmt::Display) -> Self {
        Self::Inbound(err.to_string())
    }

    pub fn outbound(err: impl std::fmt::Display) -> Self {
        Self::Outbound(err.to_string())
    }
}
