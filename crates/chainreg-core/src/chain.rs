//! Chain metadata records.
//!
//! Serialized with camelCase keys so catalog files read like the usual
//! chain-list JSON (`nativeCurrency`, `rpcUrls`, `webSocket`, ...).

use std::collections::BTreeMap;

use alloy_primitives::{ruint::UintTryFrom, U256};
use serde::{Deserialize, Serialize};

/// Provider group every catalog entry is expected to carry.
pub const PROVIDER_DEFAULT: &str = "default";
/// Provider group for free community endpoints.
pub const PROVIDER_PUBLIC: &str = "public";

/// Native currency of a chain, e.g. Ether (ETH, 18 decimals).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

/// RPC endpoints published by one provider for a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTarget {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub http: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_socket: Vec<String>,
}

impl RpcTarget {
    pub fn new(
        http: impl IntoIterator<Item = impl Into<String>>,
        web_socket: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            http: http.into_iter().map(Into::into).collect(),
            web_socket: web_socket.into_iter().map(Into::into).collect(),
        }
    }

    pub fn http_only(http: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(http, Vec::<String>::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExplorer {
    pub name: String,
    pub url: String,
}

/// A known contract deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_created: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contracts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicall3: Option<Contract>,
}

/// An Ethereum-compatible network.
///
/// `id` is optional only so that incomplete catalog entries can be
/// represented; records without an ID are ignored on registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRecord {
    #[serde(default)]
    pub id: Option<U256>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub rpc_urls: BTreeMap<String, RpcTarget>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub block_explorers: BTreeMap<String, BlockExplorer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contracts: Option<Contracts>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_testnet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ens_registry: Option<Contract>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ens_universal_resolver: Option<Contract>,
}

impl ChainRecord {
    /// Minimal record with an ID, a name and an 18-decimal native currency.
    ///
    /// Accepts native integers (`137u64`, `10u32`) as well as [`U256`]. A
    /// negative ID leaves `id` empty, so the directory will not store it.
    pub fn new<T>(id: T, name: impl Into<String>, symbol: impl Into<String>) -> Self
    where
        U256: UintTryFrom<T>,
    {
        let symbol = symbol.into();
        Self {
            id: U256::uint_try_from(id).ok(),
            name: name.into(),
            native_currency: NativeCurrency {
                name: symbol.clone(),
                symbol,
                decimals: 18,
            },
            ..Default::default()
        }
    }

    /// Builder-style setter for a provider's endpoints.
    pub fn with_provider(mut self, provider: impl Into<String>, target: RpcTarget) -> Self {
        self.rpc_urls.insert(provider.into(), target);
        self
    }

    /// Provider names in iteration (lexicographic) order.
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.rpc_urls.keys().map(String::as_str)
    }

    /// HTTP URLs of the `default` provider, or an empty slice.
    pub fn default_http(&self) -> &[String] {
        self.rpc_urls
            .get(PROVIDER_DEFAULT)
            .map(|t| t.http.as_slice())
            .unwrap_or(&[])
    }

    /// The ID rendered in decimal, or `"<none>"`.
    pub fn id_string(&self) -> String {
        self.id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "<none>".into())
    }
}

impl std::fmt::Display for ChainRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id_string())
    }
}
