//! Registry configuration, loadable from a JSON file.
//!
//! ```json
//! {
//!   "check_timeout_ms": 3000,
//!   "cache_ttl_secs": 30,
//!   "catalog_files": ["./chains.local.json"],
//!   "rpc_overrides": { "1": ["https://eth.example"], "Base": ["https://base.example"] },
//!   "http": { "user_agent": "my-app/1.0" },
//!   "log": { "level": "info", "components": { "chainreg_core": "debug" } }
//! }
//! ```

use std::{collections::BTreeMap, path::Path, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use chainreg_core::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Per-endpoint probe timeout used by fastest-RPC selection.
    pub check_timeout_ms: u64,
    /// Lifetime of cached health-check results.
    pub cache_ttl_secs: u64,
    /// Register the built-in network catalog.
    pub builtin_catalog: bool,
    /// Extra catalog files, registered in order after the built-in one.
    pub catalog_files: Vec<PathBuf>,
    /// Chain identifier (ID or name) → default RPC URLs.
    pub rpc_overrides: BTreeMap<String, Vec<String>>,
    pub http: HttpConfig,
    pub log: LogConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            check_timeout_ms: 5_000,
            cache_ttl_secs: 60,
            builtin_catalog: true,
            catalog_files: Vec::new(),
            rpc_overrides: BTreeMap::new(),
            http: HttpConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl RegistryConfig {
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Catalog(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
            .map_err(|e| RegistryError::Catalog(format!("{}: {e}", path.display())))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: Option<String>,
}

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: crate name → level
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: BTreeMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// `EnvFilter` directive string, e.g. `"info,chainreg_core=debug"`.
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (component, level) in &self.components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }
}
