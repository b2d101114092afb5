//! In-memory chain directory.
//!
//! Thread-safe via `Arc<RwLock<Inner>>`. Records are stored behind `Arc` so
//! lookups hand out cheap snapshots; a re-registration swaps the whole record.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use alloy_primitives::U256;

use crate::{
    chain::{ChainRecord, PROVIDER_DEFAULT},
    error::RegistryError,
    identifier::{parse_integer_literal, ChainIdentifier},
};

#[derive(Default)]
struct Inner {
    /// ID → record
    by_id: HashMap<U256, Arc<ChainRecord>>,
    /// name → record (non-empty names only)
    by_name: HashMap<String, Arc<ChainRecord>>,
    /// ID → URLs replacing the default provider's HTTP list
    overrides: HashMap<U256, Vec<String>>,
}

impl Inner {
    fn insert(&mut self, id: U256, record: Arc<ChainRecord>) {
        if let Some(previous) = self.by_id.insert(id, Arc::clone(&record)) {
            // drop the old name if it still points at this chain
            if previous.name != record.name
                && self
                    .by_name
                    .get(&previous.name)
                    .is_some_and(|r| r.id == Some(id))
            {
                self.by_name.remove(&previous.name);
            }
        }
        if !record.name.is_empty() {
            self.by_name.insert(record.name.clone(), record);
        }
    }
}

/// Thread-safe registry of chain records and per-chain RPC overrides.
#[derive(Clone, Default)]
pub struct ChainDirectory {
    inner: Arc<RwLock<Inner>>,
}

impl ChainDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a chain record.
    ///
    /// Records without an ID are ignored. Returns `true` when the record was stored.
    pub fn register(&self, record: ChainRecord) -> bool {
        let Some(id) = record.id else {
            tracing::warn!(name = %record.name, "ignoring chain registration without an ID");
            return false;
        };
        tracing::debug!(chain_id = %id, name = %record.name, "registering chain");
        self.write().insert(id, Arc::new(record));
        true
    }

    pub fn by_id(&self, id: U256) -> Option<Arc<ChainRecord>> {
        self.read().by_id.get(&id).cloned()
    }

    pub fn by_name(&self, name: &str) -> Option<Arc<ChainRecord>> {
        if name.is_empty() {
            return None;
        }
        self.read().by_name.get(name).cloned()
    }

    /// Resolve an identifier to a registered record.
    ///
    /// Names that parse as integers are tried as IDs first and fall back to
    /// a name lookup when no chain has that ID.
    pub fn resolve(&self, identifier: &ChainIdentifier) -> Result<Arc<ChainRecord>, RegistryError> {
        match identifier {
            ChainIdentifier::Id(id) => self
                .by_id(*id)
                .ok_or_else(|| RegistryError::NotFound(identifier.describe())),
            ChainIdentifier::Name(name) => {
                if name.is_empty() {
                    return Err(RegistryError::InvalidIdentifier(
                        "empty chain name".into(),
                    ));
                }
                parse_integer_literal(name)
                    .and_then(|id| self.by_id(id))
                    .or_else(|| self.by_name(name))
                    .ok_or_else(|| RegistryError::NotFound(identifier.describe()))
            }
        }
    }

    /// Replace the default HTTP RPC list for a chain. An empty list clears the override.
    pub fn set_override(
        &self,
        identifier: &ChainIdentifier,
        urls: &[String],
    ) -> Result<(), RegistryError> {
        let chain = self.resolve(identifier)?;
        let Some(id) = chain.id else {
            return Err(RegistryError::NotFound(identifier.describe()));
        };
        let mut inner = self.write();
        if urls.is_empty() {
            inner.overrides.remove(&id);
        } else {
            inner.overrides.insert(id, urls.to_vec());
        }
        Ok(())
    }

    /// Default HTTP RPC URLs for a chain: the override if set, else the
    /// `default` provider's HTTP list, else empty.
    pub fn configured_rpcs(&self, identifier: &ChainIdentifier) -> Result<Vec<String>, RegistryError> {
        let chain = self.resolve(identifier)?;
        let overridden = chain
            .id
            .and_then(|id| self.read().overrides.get(&id).cloned());
        Ok(overridden.unwrap_or_else(|| {
            chain
                .rpc_urls
                .get(PROVIDER_DEFAULT)
                .map(|t| t.http.clone())
                .unwrap_or_default()
        }))
    }

    /// All registered records, sorted by ID.
    pub fn chains(&self) -> Vec<Arc<ChainRecord>> {
        let mut chains: Vec<_> = self.read().by_id.values().cloned().collect();
        chains.sort_by_key(|c| c.id);
        chains
    }

    /// Snapshot of the current overrides.
    pub fn overrides(&self) -> HashMap<U256, Vec<String>> {
        self.read().overrides.clone()
    }

    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ChainDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainDirectory")
            .field("chains", &self.len())
            .finish()
    }
}
