//! chainreg-ws: `eth_blockNumber` liveness probe over WebSocket.
//!
//! Each probe dials a fresh connection, exchanges one request/response
//! pair and drops the socket. No reconnects, no subscriptions.

pub mod prober;

pub use prober::WsProber;
