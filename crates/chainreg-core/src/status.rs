//! Outcome of probing a single endpoint.

use std::time::Duration;

use alloy_primitives::U256;
use serde::{Serialize, Serializer};

use crate::error::ProbeError;

/// Which protocol a URL is probed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Http,
    WebSocket,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::WebSocket => write!(f, "websocket"),
        }
    }
}

/// Result of one probe.
///
/// `available` implies `error.is_none()` and `block_number.is_some()`.
/// Unavailable statuses carry the error, no block number and a zero latency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointStatus {
    pub url: String,
    pub transport: TransportKind,
    pub available: bool,
    #[serde(serialize_with = "serialize_latency", skip_serializing_if = "Duration::is_zero")]
    pub latency: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U256>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ProbeError>,
}

impl EndpointStatus {
    pub fn available(
        url: impl Into<String>,
        transport: TransportKind,
        latency: Duration,
        block_number: U256,
    ) -> Self {
        Self {
            url: url.into(),
            transport,
            available: true,
            latency,
            block_number: Some(block_number),
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, transport: TransportKind, error: ProbeError) -> Self {
        Self {
            url: url.into(),
            transport,
            available: false,
            latency: Duration::ZERO,
            block_number: None,
            error: Some(error),
        }
    }
}

fn serialize_latency<S: Serializer>(latency: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(latency.as_millis() as u64)
}

fn serialize_error<S: Serializer>(error: &Option<ProbeError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}
