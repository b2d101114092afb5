//! Concurrent endpoint health checks.
//!
//! One tokio task per candidate URL; results come back in candidate order
//! regardless of completion order.

use std::{sync::Arc, time::Duration};

use futures::future::join_all;

use crate::{
    chain::{ChainRecord, PROVIDER_DEFAULT, PROVIDER_PUBLIC},
    context::CallContext,
    directory::ChainDirectory,
    error::{ProbeError, RegistryError},
    identifier::ChainIdentifier,
    probe::Prober,
    status::{EndpointStatus, TransportKind},
};

/// Default per-probe timeout.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Which endpoints a health check covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub timeout_per_check: Duration,
    pub check_http: bool,
    pub check_websocket: bool,
    /// Provider groups to probe, in order. Empty means every provider on the chain.
    pub providers: Vec<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            timeout_per_check: DEFAULT_CHECK_TIMEOUT,
            check_http: true,
            check_websocket: true,
            providers: vec![PROVIDER_DEFAULT.into(), PROVIDER_PUBLIC.into()],
        }
    }
}

/// Candidate URLs in probe order: per provider, HTTP first then WebSocket.
///
/// Unknown providers and empty URLs are skipped.
pub fn candidates(
    chain: &ChainRecord,
    providers: &[String],
    http: bool,
    websocket: bool,
) -> Vec<(String, TransportKind)> {
    let groups: Vec<&str> = if providers.is_empty() {
        chain.providers().collect()
    } else {
        providers.iter().map(String::as_str).collect()
    };

    let mut out = Vec::new();
    for provider in groups {
        let Some(target) = chain.rpc_urls.get(provider) else {
            continue;
        };
        if http {
            out.extend(
                target
                    .http
                    .iter()
                    .filter(|u| !u.is_empty())
                    .map(|u| (u.clone(), TransportKind::Http)),
            );
        }
        if websocket {
            out.extend(
                target
                    .web_socket
                    .iter()
                    .filter(|u| !u.is_empty())
                    .map(|u| (u.clone(), TransportKind::WebSocket)),
            );
        }
    }
    out
}

/// Probes every candidate endpoint of a chain concurrently.
#[derive(Clone)]
pub struct HealthChecker {
    directory: ChainDirectory,
    prober: Arc<dyn Prober>,
}

impl HealthChecker {
    pub fn new(directory: ChainDirectory, prober: Arc<dyn Prober>) -> Self {
        Self { directory, prober }
    }

    pub fn directory(&self) -> &ChainDirectory {
        &self.directory
    }

    /// Probe every endpoint selected by `options`.
    ///
    /// Resolution errors are returned before any I/O. If `ctx` is cancelled
    /// or expires while the batch runs, every status collected so far is
    /// returned inside [`RegistryError::Cancelled`].
    pub async fn check_all(
        &self,
        ctx: &CallContext,
        identifier: &ChainIdentifier,
        options: &CheckOptions,
    ) -> Result<Vec<EndpointStatus>, RegistryError> {
        let chain = self.directory.resolve(identifier)?;
        let targets = candidates(
            &chain,
            &options.providers,
            options.check_http,
            options.check_websocket,
        );
        if targets.is_empty() {
            tracing::debug!(chain = %chain, "no endpoints to check");
            return Ok(Vec::new());
        }

        let handles = targets.iter().map(|(url, kind)| {
            let prober = Arc::clone(&self.prober);
            let ctx = ctx.clone();
            let url = url.clone();
            let kind = *kind;
            let limit = options.timeout_per_check;
            tokio::spawn(async move { probe_within(prober.as_ref(), &ctx, &url, kind, limit).await })
        });
        let joined = join_all(handles).await;

        let statuses: Vec<EndpointStatus> = joined
            .into_iter()
            .zip(targets)
            .map(|(res, (url, kind))| match res {
                Ok(status) => status,
                Err(e) => EndpointStatus::failed(url, kind, ProbeError::Task(e.to_string())),
            })
            .collect();

        if let Some(reason) = ctx.err() {
            tracing::warn!(
                chain = %chain,
                reason = %reason,
                completed = completed(&statuses),
                available = statuses.iter().filter(|s| s.available).count(),
                total = statuses.len(),
                "health check interrupted"
            );
            return Err(RegistryError::Cancelled {
                reason,
                partial: statuses,
            });
        }

        tracing::debug!(
            chain = %chain,
            available = statuses.iter().filter(|s| s.available).count(),
            total = statuses.len(),
            "health check finished"
        );
        Ok(statuses)
    }
}

impl std::fmt::Debug for HealthChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthChecker")
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

/// Probes that ran to an outcome (success, failure or timeout) before cancellation.
fn completed(statuses: &[EndpointStatus]) -> usize {
    statuses
        .iter()
        .filter(|s| s.error != Some(ProbeError::Cancelled))
        .count()
}

/// Run one probe bounded by `min(limit, ctx remaining)` and by ctx cancellation.
async fn probe_within(
    prober: &dyn Prober,
    ctx: &CallContext,
    url: &str,
    kind: TransportKind,
    limit: Duration,
) -> EndpointStatus {
    if ctx.err().is_some() {
        return EndpointStatus::failed(url, kind, ProbeError::Cancelled);
    }
    let budget = ctx.budget(limit);

    let status = tokio::select! {
        biased;
        _ = ctx.token().cancelled() => EndpointStatus::failed(url, kind, ProbeError::Cancelled),
        res = tokio::time::timeout(budget, prober.probe(url, kind, budget)) => match res {
            Ok(status) => status,
            Err(_) => EndpointStatus::failed(
                url,
                kind,
                ProbeError::Timeout { ms: budget.as_millis() as u64 },
            ),
        },
    };

    match &status.error {
        None => tracing::debug!(
            url,
            transport = %kind,
            latency_ms = status.latency.as_millis() as u64,
            block = ?status.block_number,
            "endpoint available"
        ),
        Some(error) => tracing::debug!(
            url,
            transport = %kind,
            %error,
            protocol = error.is_protocol_error(),
            "endpoint unavailable"
        ),
    }
    status
}
