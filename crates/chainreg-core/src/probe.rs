//! The `Prober` trait and the `eth_blockNumber` response validation shared
//! by every transport.

use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProbeError;
use crate::request::{JsonRpcResponse, RpcId};
use crate::status::{EndpointStatus, TransportKind};

/// Liveness probe for a single endpoint.
///
/// Implementations never fail: every outcome, including timeouts, is
/// reported through the returned [`EndpointStatus`].
///
/// The trait is object-safe and stored as `Arc<dyn Prober>`.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, url: &str, transport: TransportKind, timeout: Duration) -> EndpointStatus;
}

/// Decode a raw JSON-RPC response body and extract the block number.
pub fn decode_block_number(body: &[u8], expected_id: &RpcId) -> Result<U256, ProbeError> {
    let resp: JsonRpcResponse =
        serde_json::from_slice(body).map_err(|e| ProbeError::Decode(e.to_string()))?;
    block_number_from_response(resp, expected_id)
}

/// Validate a decoded response: error object, then id, then result.
pub fn block_number_from_response(
    resp: JsonRpcResponse,
    expected_id: &RpcId,
) -> Result<U256, ProbeError> {
    if let Some(err) = resp.error {
        return Err(ProbeError::Rpc(err));
    }
    if &resp.id != expected_id {
        return Err(ProbeError::IdMismatch {
            got: resp.id.to_string(),
            expected: expected_id.to_string(),
        });
    }
    match resp.result {
        Some(Value::String(hex)) => parse_block_hex(&hex),
        Some(other) => Err(ProbeError::InvalidResult(format!(
            "expected hex string, got {other}"
        ))),
        None => Err(ProbeError::InvalidResult("missing result".into())),
    }
}

/// Parse a `0x`-prefixed hex quantity.
pub fn parse_block_hex(hex: &str) -> Result<U256, ProbeError> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .ok_or_else(|| ProbeError::InvalidResult(format!("missing 0x prefix: {hex:?}")))?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ProbeError::InvalidResult(format!("not a hex quantity: {hex:?}")));
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| ProbeError::InvalidResult(format!("{hex:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: RpcId = RpcId::Number(1);

    #[test]
    fn valid_response() {
        let n = decode_block_number(br#"{"jsonrpc":"2.0","id":1,"result":"0x1b4"}"#, &ID).unwrap();
        assert_eq!(n, U256::from(436u64));
    }

    #[test]
    fn rpc_error_checked_before_id() {
        let err = decode_block_number(
            br#"{"jsonrpc":"2.0","id":99,"error":{"code":-32005,"message":"limit exceeded"}}"#,
            &ID,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "RPC error -32005: limit exceeded");
    }

    #[test]
    fn id_mismatch() {
        let err = decode_block_number(br#"{"jsonrpc":"2.0","id":2,"result":"0x1"}"#, &ID).unwrap_err();
        assert_eq!(
            err,
            ProbeError::IdMismatch {
                got: "2".into(),
                expected: "1".into()
            }
        );
        let missing = decode_block_number(br#"{"jsonrpc":"2.0","result":"0x1"}"#, &ID).unwrap_err();
        assert!(matches!(missing, ProbeError::IdMismatch { .. }));
    }

    #[test]
    fn bad_results() {
        for body in [
            r#"{"jsonrpc":"2.0","id":1,"result":"123"}"#,
            r#"{"jsonrpc":"2.0","id":1,"result":"0x"}"#,
            r#"{"jsonrpc":"2.0","id":1,"result":"0xzz"}"#,
            r#"{"jsonrpc":"2.0","id":1,"result":291}"#,
            r#"{"jsonrpc":"2.0","id":1}"#,
        ] {
            let err = decode_block_number(body.as_bytes(), &ID).unwrap_err();
            assert!(matches!(err, ProbeError::InvalidResult(_)), "{body}: {err}");
        }
    }

    #[test]
    fn undecodable_body() {
        let err = decode_block_number(b"<html>bad gateway</html>", &ID).unwrap_err();
        assert!(matches!(err, ProbeError::Decode(_)));
    }
}
