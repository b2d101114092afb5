//! WebSocket probe backed by `tokio-tungstenite`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use chainreg_core::error::ProbeError;
use chainreg_core::probe::{decode_block_number, Prober};
use chainreg_core::request::JsonRpcRequest;
use chainreg_core::status::{EndpointStatus, TransportKind};
use chainreg_core::U256;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// `eth_blockNumber` probe over a one-shot WebSocket connection.
///
/// The handshake gets half of the probe budget; the request write and the
/// response read share whatever is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsProber;

impl WsProber {
    pub fn new() -> Self {
        Self
    }

    /// Dial `url`, send `eth_blockNumber` and return the head block.
    pub async fn block_number(&self, url: &str, timeout: Duration) -> Result<U256, ProbeError> {
        let started = Instant::now();
        let handshake_budget = timeout / 2;

        let (mut ws, _) =
            match tokio::time::timeout(handshake_budget, tokio_tungstenite::connect_async(url)).await {
                Err(_) => {
                    return Err(ProbeError::Timeout {
                        ms: handshake_budget.as_millis() as u64,
                    })
                }
                Ok(Err(e)) => return Err(dial_error(e)),
                Ok(Ok(conn)) => conn,
            };

        let remaining = timeout.saturating_sub(started.elapsed());
        match tokio::time::timeout(remaining, exchange(&mut ws)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout {
                ms: timeout.as_millis() as u64,
            }),
        }
    }
}

/// Map a failed dial, keeping the upgrade response when the server sent one.
fn dial_error(err: tungstenite::Error) -> ProbeError {
    match err {
        tungstenite::Error::Http(resp) => ProbeError::Handshake {
            reason: "server rejected websocket upgrade".into(),
            status: resp.status().as_u16(),
            body: resp
                .body()
                .as_deref()
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default(),
        },
        other => ProbeError::WebSocket(other.to_string()),
    }
}

async fn exchange(ws: &mut WsStream) -> Result<U256, ProbeError> {
    let req = JsonRpcRequest::block_number();
    let payload = serde_json::to_string(&req).map_err(|e| ProbeError::Decode(e.to_string()))?;
    ws.send(Message::Text(payload))
        .await
        .map_err(|e| ProbeError::WebSocket(format!("write failed: {e}")))?;

    while let Some(msg) = ws.next().await {
        match msg.map_err(|e| ProbeError::WebSocket(format!("read failed: {e}")))? {
            Message::Text(text) => return decode_block_number(text.as_bytes(), &req.id),
            Message::Binary(bin) => return decode_block_number(&bin, &req.id),
            Message::Close(frame) => {
                let reason = frame
                    .map(|f| format!("{} {}", f.code, f.reason))
                    .unwrap_or_else(|| "no close frame".into());
                return Err(ProbeError::WebSocket(format!(
                    "connection closed before response: {reason}"
                )));
            }
            // ping / pong / raw frames
            _ => continue,
        }
    }
    Err(ProbeError::WebSocket(
        "connection closed before response".into(),
    ))
}

#[async_trait]
impl Prober for WsProber {
    async fn probe(&self, url: &str, transport: TransportKind, timeout: Duration) -> EndpointStatus {
        let started = Instant::now();
        match self.block_number(url, timeout).await {
            Ok(block) => EndpointStatus::available(url, transport, started.elapsed(), block),
            Err(error) => {
                tracing::trace!(url, %error, "websocket probe failed");
                EndpointStatus::failed(url, transport, error)
            }
        }
    }
}
