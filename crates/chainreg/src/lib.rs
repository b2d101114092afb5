//! chainreg: EVM chain metadata registry with concurrent RPC health checks
//! and endpoint selection.
//!
//! # Quick start
//! ```rust,no_run
//! use chainreg::{CallContext, ChainRegistry, SelectionCriteria};
//!
//! # async fn run() -> Result<(), chainreg::RegistryError> {
//! let registry = ChainRegistry::new()?;
//! let ctx = CallContext::background();
//!
//! // fastest healthy HTTP endpoint for Base, cached for a minute
//! let url = registry
//!     .get_fastest_rpc(&ctx, "Base", &SelectionCriteria::default())
//!     .await?;
//! println!("{url}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod network;

use std::sync::Arc;

pub use chainreg_catalog as catalog;
pub use chainreg_core::{
    chain::{BlockExplorer, Contract, Contracts, NativeCurrency},
    CallContext, CancelReason, ChainDirectory, ChainIdentifier, ChainRecord, CheckOptions,
    EndpointStatus, FastestConfig, ProbeError, Prober, RegistryError, RpcTarget,
    SelectionCriteria, TransportKind, UintTryFrom, PROVIDER_DEFAULT, PROVIDER_PUBLIC, U256,
};
pub use config::{HttpConfig, LogConfig, RegistryConfig};
pub use network::NetworkProber;

use chainreg_core::{select, FastestSelector, HealthChecker};
use chainreg_http::HttpProberConfig;

/// Chain registry with health checking and RPC selection.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct ChainRegistry {
    directory: ChainDirectory,
    fastest: FastestSelector,
}

impl ChainRegistry {
    /// Built-in catalog, network probers and default timeouts.
    pub fn new() -> Result<Self, RegistryError> {
        Self::from_config(&RegistryConfig::default())
    }

    /// Build probers, load catalogs and apply RPC overrides from `config`.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let prober = NetworkProber::new(HttpProberConfig {
            user_agent: config.http.user_agent.clone(),
        })?;

        let directory = ChainDirectory::new();
        if config.builtin_catalog {
            chainreg_catalog::register_builtin(&directory)?;
        }
        for path in &config.catalog_files {
            chainreg_catalog::register_file(&directory, path)?;
        }

        let registry = Self::with_prober(
            directory,
            Arc::new(prober),
            FastestConfig {
                ttl: config.cache_ttl(),
                timeout_per_check: config.check_timeout(),
            },
        );
        for (identifier, urls) in &config.rpc_overrides {
            registry.set_chain_rpcs(identifier.as_str(), urls)?;
        }
        tracing::debug!(
            chains = registry.directory.len(),
            overrides = config.rpc_overrides.len(),
            "chain registry ready"
        );
        Ok(registry)
    }

    /// Assemble a registry from parts, e.g. with a mock prober in tests.
    pub fn with_prober(
        directory: ChainDirectory,
        prober: Arc<dyn Prober>,
        config: FastestConfig,
    ) -> Self {
        let checker = HealthChecker::new(directory.clone(), prober);
        Self {
            directory,
            fastest: FastestSelector::new(checker, config),
        }
    }

    pub fn directory(&self) -> &ChainDirectory {
        &self.directory
    }

    /// All registered chains, sorted by ID.
    pub fn chains(&self) -> Vec<Arc<ChainRecord>> {
        self.directory.chains()
    }

    /// Insert or replace a chain. Returns `false` (and stores nothing) when the record has no ID.
    pub fn register_chain(&self, record: ChainRecord) -> bool {
        self.directory.register(record)
    }

    /// Lookup by numeric ID; native integers and [`U256`] are accepted. A
    /// negative ID matches nothing.
    pub fn get_chain_by_id<T>(&self, id: T) -> Option<Arc<ChainRecord>>
    where
        U256: UintTryFrom<T>,
    {
        let id = U256::uint_try_from(id).ok()?;
        self.directory.by_id(id)
    }

    pub fn get_chain_by_name(&self, name: &str) -> Option<Arc<ChainRecord>> {
        self.directory.by_name(name)
    }

    /// Override the default HTTP RPC list for a chain. An empty slice clears the override.
    pub fn set_chain_rpcs(
        &self,
        identifier: impl Into<ChainIdentifier>,
        urls: &[String],
    ) -> Result<(), RegistryError> {
        self.directory.set_override(&identifier.into(), urls)
    }

    /// Default HTTP RPC URLs: override, else the `default` provider's list.
    pub fn get_chain_rpcs(
        &self,
        identifier: impl Into<ChainIdentifier>,
    ) -> Result<Vec<String>, RegistryError> {
        self.directory.configured_rpcs(&identifier.into())
    }

    /// Probe every endpoint selected by `options` concurrently.
    pub async fn check_rpcs(
        &self,
        ctx: &CallContext,
        identifier: impl Into<ChainIdentifier>,
        options: &CheckOptions,
    ) -> Result<Vec<EndpointStatus>, RegistryError> {
        self.fastest
            .checker()
            .check_all(ctx, &identifier.into(), options)
            .await
    }

    /// Lowest-latency available endpoint, from cache when fresh.
    pub async fn get_fastest_rpc(
        &self,
        ctx: &CallContext,
        identifier: impl Into<ChainIdentifier>,
        criteria: &SelectionCriteria,
    ) -> Result<String, RegistryError> {
        self.fastest.fastest(ctx, &identifier.into(), criteria).await
    }

    pub fn get_first_rpc(
        &self,
        identifier: impl Into<ChainIdentifier>,
        criteria: &SelectionCriteria,
    ) -> Result<String, RegistryError> {
        select::first_rpc(&self.directory, &identifier.into(), criteria)
    }

    pub fn get_random_rpc(
        &self,
        identifier: impl Into<ChainIdentifier>,
        criteria: &SelectionCriteria,
    ) -> Result<String, RegistryError> {
        select::random_rpc(&self.directory, &identifier.into(), criteria)
    }

    /// Forget cached fastest-RPC results.
    pub fn clear_cache(&self) {
        self.fastest.clear_cache();
    }
}

impl std::fmt::Debug for ChainRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainRegistry")
            .field("directory", &self.directory)
            .field("fastest", &self.fastest.config())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline(config: RegistryConfig) -> ChainRegistry {
        ChainRegistry::from_config(&config).unwrap()
    }

    #[test]
    fn default_registry_has_builtin_chains() {
        let registry = offline(RegistryConfig::default());
        assert_eq!(registry.chains().len(), catalog::ids::ALL.len());
        assert_eq!(
            registry.get_chain_by_id(catalog::ids::POLYGON).unwrap().name,
            "Polygon"
        );
        assert_eq!(
            registry.get_first_rpc("Base", &SelectionCriteria::default()).unwrap(),
            "https://mainnet.base.org"
        );
    }

    #[test]
    fn chain_by_id_accepts_native_integers() {
        let registry = offline(RegistryConfig::default());
        let by_u64 = registry.get_chain_by_id(137u64).unwrap();
        let by_u32 = registry.get_chain_by_id(137u32).unwrap();
        let by_wide = registry.get_chain_by_id(U256::from(137u64)).unwrap();
        assert_eq!(by_u64.name, "Polygon");
        assert!(Arc::ptr_eq(&by_u64, &by_u32));
        assert!(Arc::ptr_eq(&by_u64, &by_wide));
        assert!(registry.get_chain_by_id(-137i64).is_none());
        assert!(registry.get_chain_by_id(999_999u64).is_none());
    }

    #[test]
    fn overrides_from_config() {
        let config = RegistryConfig::from_json(
            r#"{"rpc_overrides": {"1": ["https://eth.example"], "Polygon": ["https://polygon.example"]}}"#,
        )
        .unwrap();
        let registry = offline(config);
        assert_eq!(registry.get_chain_rpcs(1u64).unwrap(), ["https://eth.example"]);
        assert_eq!(
            registry.get_chain_rpcs("0x89").unwrap(),
            ["https://polygon.example"]
        );
        // overrides only affect the default-RPC lookup
        assert_eq!(
            registry.get_first_rpc(1u64, &SelectionCriteria::default()).unwrap(),
            "https://cloudflare-eth.com"
        );
    }

    #[test]
    fn override_for_unknown_chain_fails_construction() {
        let mut config = RegistryConfig::default();
        config
            .rpc_overrides
            .insert("Atlantis".into(), vec!["https://x".into()]);
        let err = ChainRegistry::from_config(&config).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn empty_registry_without_builtin_catalog() {
        let registry = offline(RegistryConfig {
            builtin_catalog: false,
            ..Default::default()
        });
        assert!(registry.directory().is_empty());
        assert!(matches!(
            registry.get_random_rpc(1u64, &SelectionCriteria::default()),
            Err(RegistryError::NotFound(_))
        ));
    }
}
