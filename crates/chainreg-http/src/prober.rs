//! HTTP probe backed by `reqwest`.
//!
//! One POST per probe, no retries. The per-request timeout is the budget
//! handed in by the health checker.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use chainreg_core::error::{ProbeError, RegistryError};
use chainreg_core::probe::{decode_block_number, Prober};
use chainreg_core::request::JsonRpcRequest;
use chainreg_core::status::{EndpointStatus, TransportKind};
use chainreg_core::U256;

/// Longest response body kept in [`ProbeError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Configuration for `HttpProber`.
#[derive(Debug, Clone, Default)]
pub struct HttpProberConfig {
    /// `User-Agent` header; reqwest's default when `None`.
    pub user_agent: Option<String>,
}

/// `eth_blockNumber` probe over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProber {
    http: reqwest::Client,
}

impl HttpProber {
    pub fn new(config: HttpProberConfig) -> Result<Self, RegistryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(ua) = &config.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        let http = builder
            .build()
            .map_err(|e| RegistryError::Client(e.to_string()))?;
        Ok(Self { http })
    }

    /// Wrap an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Send `eth_blockNumber` to `url` and return the head block.
    pub async fn block_number(&self, url: &str, timeout: Duration) -> Result<U256, ProbeError> {
        let req = JsonRpcRequest::block_number();
        let resp = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .json(&req)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| classify(e, timeout))?;
        if !status.is_success() {
            return Err(ProbeError::Status {
                code: status.as_u16(),
                body: truncate_body(body),
            });
        }

        decode_block_number(body.as_bytes(), &req.id)
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

fn classify(err: reqwest::Error, timeout: Duration) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout {
            ms: timeout.as_millis() as u64,
        }
    } else {
        ProbeError::Http(err.to_string())
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str, transport: TransportKind, timeout: Duration) -> EndpointStatus {
        let started = Instant::now();
        match self.block_number(url, timeout).await {
            Ok(block) => EndpointStatus::available(url, transport, started.elapsed(), block),
            Err(error) => {
                tracing::trace!(url, %error, "http probe failed");
                EndpointStatus::failed(url, transport, error)
            }
        }
    }
}
