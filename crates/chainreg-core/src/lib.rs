//! chainreg-core: chain directory, identifier resolution, endpoint health
//! checks and RPC selection.
//!
//! # Overview
//!
//! - [`ChainRecord`] / [`ChainDirectory`]: chain metadata and the thread-safe
//!   registry that owns it, with per-chain default-RPC overrides
//! - [`ChainIdentifier`]: a chain addressed by numeric ID or by name
//! - [`Prober`]: the async liveness probe every transport implements
//! - [`HealthChecker`]: concurrent `eth_blockNumber` probes over a chain's endpoints
//! - [`FastestSelector`]: lowest-latency endpoint with a TTL cache
//! - [`select`]: first-match and random endpoint selection without I/O
//! - [`CallContext`]: caller deadline and cancellation

pub mod chain;
pub mod context;
pub mod directory;
pub mod error;
pub mod fastest;
pub mod health;
pub mod identifier;
pub mod probe;
pub mod request;
pub mod select;
pub mod status;

pub use chain::{ChainRecord, RpcTarget, PROVIDER_DEFAULT, PROVIDER_PUBLIC};
pub use context::{CallContext, CancelReason};
pub use directory::ChainDirectory;
pub use error::{ProbeError, RegistryError};
pub use fastest::{FastestConfig, FastestSelector};
pub use health::{CheckOptions, HealthChecker};
pub use identifier::ChainIdentifier;
pub use probe::Prober;
pub use request::{JsonRpcRequest, JsonRpcResponse, RpcId};
pub use select::SelectionCriteria;
pub use status::{EndpointStatus, TransportKind};

pub use alloy_primitives::{ruint::UintTryFrom, U256};
