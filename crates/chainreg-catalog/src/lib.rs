//! chainreg-catalog: chain metadata sources.
//!
//! - [`builtin`]: the well-known networks shipped with the crate (Ethereum,
//!   its testnets, the major L2s and sidechains), embedded as JSON
//! - [`load_file`] / [`parse`]: user catalogs in the same JSON shape
//!
//! Every source ends up in [`ChainDirectory::register`], so a user catalog
//! loaded after the built-in one replaces entries with the same ID.
//!
//! # Quick start
//! ```rust,no_run
//! use chainreg_catalog::{ids, register_builtin};
//! use chainreg_core::{ChainDirectory, U256};
//!
//! let dir = ChainDirectory::new();
//! register_builtin(&dir).unwrap();
//! let base = dir.by_id(U256::from(ids::BASE)).unwrap();
//! ```

pub mod ids;

use std::path::Path;

use chainreg_core::{ChainDirectory, ChainRecord, RegistryError};

const BUILTIN_JSON: &str = include_str!("../data/chains.json");

/// Parse a JSON array of chain records.
pub fn parse(json: &str) -> Result<Vec<ChainRecord>, RegistryError> {
    serde_json::from_str(json).map_err(|e| RegistryError::Catalog(e.to_string()))
}

/// The built-in network catalog.
pub fn builtin() -> Result<Vec<ChainRecord>, RegistryError> {
    parse(BUILTIN_JSON)
}

/// Read a catalog file.
pub fn load_file(path: &Path) -> Result<Vec<ChainRecord>, RegistryError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| RegistryError::Catalog(format!("{}: {e}", path.display())))?;
    parse(&content).map_err(|e| match e {
        RegistryError::Catalog(msg) => RegistryError::Catalog(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Register every record, returning how many were stored (records without an ID are skipped).
pub fn register_all(dir: &ChainDirectory, records: Vec<ChainRecord>) -> usize {
    records
        .into_iter()
        .map(|record| dir.register(record))
        .filter(|stored| *stored)
        .count()
}

/// Register the built-in catalog.
pub fn register_builtin(dir: &ChainDirectory) -> Result<usize, RegistryError> {
    let count = register_all(dir, builtin()?);
    tracing::info!(count, "registered built-in chain catalog");
    Ok(count)
}

/// Load and register a catalog file.
pub fn register_file(dir: &ChainDirectory, path: &Path) -> Result<usize, RegistryError> {
    let count = register_all(dir, load_file(path)?);
    tracing::info!(count, path = %path.display(), "registered chain catalog file");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainreg_core::{ChainIdentifier, PROVIDER_DEFAULT, PROVIDER_PUBLIC, U256};

    const MULTICALL3: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";

    fn directory() -> ChainDirectory {
        let dir = ChainDirectory::new();
        register_builtin(&dir).unwrap();
        dir
    }

    #[test]
    fn builtin_has_every_network() {
        let dir = directory();
        assert_eq!(dir.len(), ids::ALL.len());
        for id in ids::ALL {
            assert!(dir.by_id(U256::from(id)).is_some(), "missing chain {id}");
        }
    }

    #[test]
    fn every_builtin_has_default_and_public_http() {
        for chain in builtin().unwrap() {
            for provider in [PROVIDER_DEFAULT, PROVIDER_PUBLIC] {
                let target = chain
                    .rpc_urls
                    .get(provider)
                    .unwrap_or_else(|| panic!("{chain} has no {provider} provider"));
                assert!(!target.http.is_empty(), "{chain}/{provider} has no http url");
                assert!(target.http.iter().all(|u| u.starts_with("https://")));
                assert!(target.web_socket.iter().all(|u| u.starts_with("wss://")));
            }
            assert!(chain.block_explorers.contains_key("default"), "{chain}");
        }
    }

    #[test]
    fn mainnet_record() {
        let dir = directory();
        let mainnet = dir.by_name("Ethereum Mainnet").unwrap();
        assert_eq!(mainnet.id, Some(U256::from(ids::MAINNET)));
        assert_eq!(mainnet.native_currency.symbol, "ETH");
        assert_eq!(mainnet.native_currency.decimals, 18);
        assert_eq!(mainnet.default_http()[0], "https://cloudflare-eth.com");
        assert_eq!(mainnet.rpc_urls["default"].web_socket, ["wss://ethereum-rpc.publicnode.com"]);
        let multicall = mainnet.contracts.as_ref().unwrap().multicall3.as_ref().unwrap();
        assert_eq!(multicall.address, MULTICALL3);
        assert_eq!(multicall.block_created, Some(14_353_601));
        assert_eq!(
            mainnet.ens_universal_resolver.as_ref().unwrap().block_created,
            Some(16_966_585)
        );
        assert!(mainnet.ens_registry.is_some());
        assert!(!mainnet.is_testnet);
    }

    #[test]
    fn testnets_and_missing_contracts() {
        let dir = directory();
        for id in [ids::SEPOLIA, ids::HOLESKY, ids::BERACHAIN_ARTIO] {
            assert!(dir.by_id(U256::from(id)).unwrap().is_testnet);
        }
        for id in [ids::ZKSYNC_ERA, ids::BERACHAIN_ARTIO, ids::POLYGON_ZKEVM] {
            assert!(dir.by_id(U256::from(id)).unwrap().contracts.is_none());
        }
        let base = dir.by_id(U256::from(ids::BASE)).unwrap();
        assert!(base.rpc_urls["default"].web_socket.is_empty());
    }

    #[test]
    fn names_resolve() {
        let dir = directory();
        for (name, id) in [
            ("OP Mainnet", ids::OPTIMISM),
            ("zkSync Era", ids::ZKSYNC_ERA),
            ("BNB Smart Chain", ids::BNB),
            ("Berachain Artio (Deprecated)", ids::BERACHAIN_ARTIO),
        ] {
            let chain = dir.resolve(&ChainIdentifier::from(name)).unwrap();
            assert_eq!(chain.id, Some(U256::from(id)));
        }
    }

    #[test]
    fn user_catalog_overrides_builtin() {
        let dir = directory();
        let records = parse(
            r#"[
                {"id": "0x89", "name": "Polygon PoS", "nativeCurrency": {"name": "POL", "symbol": "POL", "decimals": 18},
                 "rpcUrls": {"default": {"http": ["https://polygon.example"]}}},
                {"name": "no id, skipped"}
            ]"#,
        )
        .unwrap();
        assert_eq!(register_all(&dir, records), 1);
        let polygon = dir.by_id(U256::from(ids::POLYGON)).unwrap();
        assert_eq!(polygon.name, "Polygon PoS");
        assert!(dir.by_name("Polygon").is_none());
        assert_eq!(dir.len(), ids::ALL.len());
    }

    #[test]
    fn load_file_reports_path() {
        let path = std::env::temp_dir().join(format!("chainreg-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{not json").unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, RegistryError::Catalog(ref m) if m.contains("chainreg-bad")));

        let missing = load_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(missing, RegistryError::Catalog(_)));
    }
}
