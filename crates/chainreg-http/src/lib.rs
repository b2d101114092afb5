//! chainreg-http: `eth_blockNumber` liveness probe over HTTP POST.

pub mod prober;

pub use prober::{HttpProber, HttpProberConfig};
