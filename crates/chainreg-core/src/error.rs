//! Error types for directory lookups, selection and endpoint probes.

use thiserror::Error;

use crate::context::CancelReason;
use crate::request::JsonRpcError;
use crate::status::EndpointStatus;

/// Errors returned by the registry, health checker and selectors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The identifier does not resolve to any registered chain.
    #[error("chain not found: {0}")]
    NotFound(String),

    /// The identifier is of an unsupported kind (float, bool, negative, empty...).
    #[error("invalid chain identifier: {0}")]
    InvalidIdentifier(String),

    /// The chain resolved but no configured URL satisfies the criteria.
    #[error("no RPC URL found matching criteria for {chain}")]
    NoMatch { chain: String },

    /// The chain resolved but no probed endpoint is available under the criteria.
    #[error("no available RPC found matching criteria for {chain}")]
    NoAvailableEndpoint { chain: String },

    /// The caller's context was cancelled or expired while a batch was in flight.
    ///
    /// `partial` holds every status collected for the batch, in candidate order.
    #[error("health check interrupted: {reason}")]
    Cancelled {
        reason: CancelReason,
        partial: Vec<EndpointStatus>,
    },

    /// A chain catalog or configuration document could not be read or parsed.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A transport client could not be constructed.
    #[error("failed to build RPC client: {0}")]
    Client(String),

    /// The operating system random source failed.
    #[error("failed to generate random index: {0}")]
    Random(String),
}

impl RegistryError {
    /// Returns `true` if the identifier failed to resolve (not found or invalid).
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidIdentifier(_))
    }

    /// Partial statuses carried by a [`RegistryError::Cancelled`] error.
    pub fn partial_statuses(&self) -> Option<&[EndpointStatus]> {
        match self {
            Self::Cancelled { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Why a single endpoint probe failed. Stored inside [`EndpointStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// HTTP request failed (connection refused, TLS, body read, ...).
    #[error("http request failed: {0}")]
    Http(String),

    /// Endpoint answered with a status outside 2xx.
    #[error("http status {code}: {body}")]
    Status { code: u16, body: String },

    /// WebSocket dial/send/receive error.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// WebSocket upgrade rejected by the server.
    #[error("websocket dial failed: {reason} (status: {status}, body: {body})")]
    Handshake {
        reason: String,
        status: u16,
        body: String,
    },

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Response `id` did not match the request `id`.
    #[error("rpc response id mismatch (got {got}, expected {expected})")]
    IdMismatch { got: String, expected: String },

    /// Request could not be encoded or the response could not be decoded.
    #[error("failed to decode json-rpc response: {0}")]
    Decode(String),

    /// `result` was missing or not a `0x`-prefixed hex quantity.
    #[error("invalid block number result: {0}")]
    InvalidResult(String),

    /// The probe did not finish within its budget.
    #[error("probe timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The enclosing batch was cancelled before the probe finished.
    #[error("probe cancelled")]
    Cancelled,

    /// The probe task panicked or was aborted.
    #[error("probe task failed: {0}")]
    Task(String),
}

impl ProbeError {
    /// Returns `true` if the endpoint was reached and answered with a protocol-level problem.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::Rpc(_) | Self::IdMismatch { .. } | Self::Decode(_) | Self::InvalidResult(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_message_format() {
        let err = ProbeError::Rpc(JsonRpcError {
            code: -32000,
            message: "header not found".into(),
            data: None,
        });
        assert_eq!(err.to_string(), "RPC error -32000: header not found");
        assert!(err.is_protocol_error());
    }

    #[test]
    fn status_error_carries_body() {
        let err = ProbeError::Status {
            code: 503,
            body: "upstream down".into(),
        };
        assert_eq!(err.to_string(), "http status 503: upstream down");
        assert!(!err.is_protocol_error());
    }

    #[test]
    fn cancelled_exposes_partial_statuses() {
        let err = RegistryError::Cancelled {
            reason: CancelReason::DeadlineExceeded,
            partial: vec![],
        };
        assert_eq!(err.partial_statuses().map(|s| s.len()), Some(0));
        assert!(!err.is_resolution_error());
        assert!(RegistryError::NotFound("ID 5".into()).is_resolution_error());
    }
}
