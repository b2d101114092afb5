//! Lowest-latency endpoint selection with a time-bounded result cache.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
    time::Duration,
};

use tokio::time::Instant;

use crate::{
    context::CallContext,
    error::RegistryError,
    health::{CheckOptions, HealthChecker, DEFAULT_CHECK_TIMEOUT},
    identifier::ChainIdentifier,
    select::SelectionCriteria,
    status::{EndpointStatus, TransportKind},
};

/// Default lifetime of a cached health-check result.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastestConfig {
    pub ttl: Duration,
    pub timeout_per_check: Duration,
}

impl Default for FastestConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            timeout_per_check: DEFAULT_CHECK_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    chain_id: String,
    providers: Vec<String>,
    http: bool,
    websocket: bool,
}

impl CacheKey {
    fn new(chain_id: String, criteria: &SelectionCriteria) -> Self {
        let mut providers = criteria.providers.clone();
        providers.sort();
        Self {
            chain_id,
            providers,
            http: criteria.allow_http,
            websocket: criteria.allow_websocket,
        }
    }
}

struct CacheEntry {
    statuses: Vec<EndpointStatus>,
    expires_at: Instant,
}

/// Picks the lowest-latency available endpoint, caching health-check results.
pub struct FastestSelector {
    checker: HealthChecker,
    config: FastestConfig,
    cache: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl FastestSelector {
    pub fn new(checker: HealthChecker, config: FastestConfig) -> Self {
        Self {
            checker,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> FastestConfig {
        self.config
    }

    pub fn checker(&self) -> &HealthChecker {
        &self.checker
    }

    /// URL of the fastest available endpoint matching `criteria`.
    pub async fn fastest(
        &self,
        ctx: &CallContext,
        identifier: &ChainIdentifier,
        criteria: &SelectionCriteria,
    ) -> Result<String, RegistryError> {
        let chain = self.checker.directory().resolve(identifier)?;
        let key = CacheKey::new(chain.id_string(), criteria);

        let statuses = match self.cached(&key) {
            Some(statuses) => {
                tracing::debug!(chain_id = %key.chain_id, "using cached health check");
                statuses
            }
            None => {
                let options = CheckOptions {
                    timeout_per_check: self.config.timeout_per_check,
                    check_http: criteria.allow_http,
                    check_websocket: criteria.allow_websocket,
                    providers: criteria.providers.clone(),
                };
                let statuses = self.checker.check_all(ctx, identifier, &options).await?;
                self.store(key, statuses.clone());
                statuses
            }
        };

        pick_fastest(&statuses, criteria)
            .map(|s| s.url.clone())
            .ok_or_else(|| RegistryError::NoAvailableEndpoint {
                chain: chain.to_string(),
            })
    }

    /// Drop every cached result.
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn cached(&self, key: &CacheKey) -> Option<Vec<EndpointStatus>> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.statuses.clone())
    }

    fn store(&self, key: CacheKey, statuses: Vec<EndpointStatus>) {
        let entry = CacheEntry {
            statuses,
            expires_at: Instant::now() + self.config.ttl,
        };
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }
}

/// Minimum-latency available status with a permitted transport; first wins ties.
pub fn pick_fastest<'a>(
    statuses: &'a [EndpointStatus],
    criteria: &SelectionCriteria,
) -> Option<&'a EndpointStatus> {
    let mut best: Option<&EndpointStatus> = None;
    for status in statuses {
        let permitted = match status.transport {
            TransportKind::Http => criteria.allow_http,
            TransportKind::WebSocket => criteria.allow_websocket,
        };
        if !status.available || !permitted {
            continue;
        }
        if best.map_or(true, |b| status.latency < b.latency) {
            best = Some(status);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ChainDirectory;
    use crate::health::tests::{sample_chain, ScriptedProber};
    use alloy_primitives::U256;
    use std::sync::Arc;

    fn selector(prober: ScriptedProber, ttl: Duration) -> (FastestSelector, Arc<ScriptedProber>) {
        let dir = ChainDirectory::new();
        dir.register(sample_chain());
        let prober = Arc::new(prober);
        let checker = HealthChecker::new(dir, prober.clone());
        let config = FastestConfig {
            ttl,
            ..Default::default()
        };
        (FastestSelector::new(checker, config), prober)
    }

    fn status(url: &str, transport: TransportKind, ms: u64) -> EndpointStatus {
        EndpointStatus::available(url, transport, Duration::from_millis(ms), U256::from(1u64))
    }

    #[test]
    fn pick_prefers_lowest_latency_first_on_ties() {
        let statuses = vec![
            status("a", TransportKind::Http, 30),
            status("b", TransportKind::Http, 10),
            status("c", TransportKind::Http, 10),
            status("d", TransportKind::WebSocket, 1),
        ];
        let criteria = SelectionCriteria::default();
        assert_eq!(pick_fastest(&statuses, &criteria).unwrap().url, "b");

        let ws = SelectionCriteria {
            allow_websocket: true,
            ..Default::default()
        };
        assert_eq!(pick_fastest(&statuses, &ws).unwrap().url, "d");
    }

    #[tokio::test]
    async fn selects_fastest_endpoint() {
        let prober = ScriptedProber::default()
            .with_delay("http://default-1", 80)
            .with_delay("http://default-2", 40)
            .with_delay("http://public-1", 5);
        let (selector, _) = selector(prober, DEFAULT_CACHE_TTL);
        let url = selector
            .fastest(&CallContext::background(), &10u64.into(), &SelectionCriteria::default())
            .await
            .unwrap();
        assert_eq!(url, "http://public-1");
    }

    #[tokio::test]
    async fn all_unavailable_is_no_available_endpoint() {
        let prober = ScriptedProber::default()
            .failing("http://default-1")
            .failing("http://default-2")
            .failing("http://public-1");
        let (selector, _) = selector(prober, DEFAULT_CACHE_TTL);
        let err = selector
            .fastest(&CallContext::background(), &"OP Mainnet".into(), &SelectionCriteria::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NoAvailableEndpoint { .. }));
    }

    #[tokio::test]
    async fn cache_hit_within_ttl() {
        let (selector, prober) = selector(ScriptedProber::default(), DEFAULT_CACHE_TTL);
        let ctx = CallContext::background();
        let criteria = SelectionCriteria::default();
        selector.fastest(&ctx, &10u64.into(), &criteria).await.unwrap();
        let after_first = prober.calls();
        assert_eq!(after_first, 3);

        // same chain by name, providers in another order: same cache key
        let reordered = SelectionCriteria {
            providers: vec!["public".into(), "default".into()],
            ..Default::default()
        };
        selector.fastest(&ctx, &"OP Mainnet".into(), &reordered).await.unwrap();
        assert_eq!(prober.calls(), after_first);
    }

    #[tokio::test]
    async fn cache_expires_after_ttl() {
        let (selector, prober) = selector(ScriptedProber::default(), Duration::from_millis(50));
        let ctx = CallContext::background();
        let criteria = SelectionCriteria::default();
        selector.fastest(&ctx, &10u64.into(), &criteria).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        selector.fastest(&ctx, &10u64.into(), &criteria).await.unwrap();
        assert_eq!(prober.calls(), 6);
    }

    #[tokio::test]
    async fn different_criteria_use_separate_entries() {
        let (selector, prober) = selector(ScriptedProber::default(), DEFAULT_CACHE_TTL);
        let ctx = CallContext::background();
        selector
            .fastest(&ctx, &10u64.into(), &SelectionCriteria::default())
            .await
            .unwrap();
        let ws = SelectionCriteria {
            allow_http: false,
            allow_websocket: true,
            ..Default::default()
        };
        let url = selector.fastest(&ctx, &10u64.into(), &ws).await.unwrap();
        assert!(url.starts_with("ws://"));
        assert_eq!(prober.calls(), 5);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let (selector, prober) = selector(
            ScriptedProber::default().with_delay("http://default-1", 500),
            DEFAULT_CACHE_TTL,
        );
        let ctx = CallContext::with_timeout(Duration::from_millis(30));
        let err = selector
            .fastest(&ctx, &10u64.into(), &SelectionCriteria::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Cancelled { .. }));

        selector
            .fastest(&CallContext::background(), &10u64.into(), &SelectionCriteria::default())
            .await
            .unwrap();
        assert_eq!(prober.calls(), 6);
    }

    #[tokio::test]
    async fn unknown_chain_fails_fast() {
        let (selector, prober) = selector(ScriptedProber::default(), DEFAULT_CACHE_TTL);
        let err = selector
            .fastest(&CallContext::background(), &1u64.into(), &SelectionCriteria::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
        assert_eq!(prober.calls(), 0);
    }
}
