//! Static RPC selection: first match and uniform random pick, no I/O.

use rand::{rngs::OsRng, RngCore};

use crate::{
    chain::{ChainRecord, PROVIDER_DEFAULT, PROVIDER_PUBLIC},
    directory::ChainDirectory,
    error::RegistryError,
    health::candidates,
    identifier::ChainIdentifier,
};

/// Which endpoints a selector may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub allow_http: bool,
    pub allow_websocket: bool,
    /// Provider groups in preference order. Empty means every provider.
    pub providers: Vec<String>,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            allow_http: true,
            allow_websocket: false,
            providers: vec![PROVIDER_DEFAULT.into(), PROVIDER_PUBLIC.into()],
        }
    }
}

impl SelectionCriteria {
    fn groups<'a>(&'a self, chain: &'a ChainRecord) -> Vec<&'a str> {
        if self.providers.is_empty() {
            chain.providers().collect()
        } else {
            self.providers.iter().map(String::as_str).collect()
        }
    }
}

fn first_non_empty(urls: &[String]) -> Option<&String> {
    urls.iter().find(|u| !u.is_empty())
}

/// First URL by provider order: a provider's first HTTP URL if HTTP is
/// allowed, else its first WebSocket URL if WebSocket is allowed.
pub fn first_rpc(
    directory: &ChainDirectory,
    identifier: &ChainIdentifier,
    criteria: &SelectionCriteria,
) -> Result<String, RegistryError> {
    let chain = directory.resolve(identifier)?;
    for provider in criteria.groups(&chain) {
        let Some(target) = chain.rpc_urls.get(provider) else {
            continue;
        };
        if criteria.allow_http {
            if let Some(url) = first_non_empty(&target.http) {
                return Ok(url.clone());
            }
        }
        if criteria.allow_websocket {
            if let Some(url) = first_non_empty(&target.web_socket) {
                return Ok(url.clone());
            }
        }
    }
    Err(RegistryError::NoMatch {
        chain: chain.to_string(),
    })
}

/// Every URL matching `criteria`: per provider, HTTP then WebSocket.
pub fn matching_rpcs(chain: &ChainRecord, criteria: &SelectionCriteria) -> Vec<String> {
    candidates(
        chain,
        &criteria.providers,
        criteria.allow_http,
        criteria.allow_websocket,
    )
    .into_iter()
    .map(|(url, _)| url)
    .collect()
}

/// Uniformly random matching URL, drawn from the OS CSPRNG.
pub fn random_rpc(
    directory: &ChainDirectory,
    identifier: &ChainIdentifier,
    criteria: &SelectionCriteria,
) -> Result<String, RegistryError> {
    random_rpc_from(&mut OsRng, directory, identifier, criteria)
}

fn random_rpc_from<R: RngCore + ?Sized>(
    rng: &mut R,
    directory: &ChainDirectory,
    identifier: &ChainIdentifier,
    criteria: &SelectionCriteria,
) -> Result<String, RegistryError> {
    let chain = directory.resolve(identifier)?;
    let mut urls = matching_rpcs(&chain, criteria);
    if urls.is_empty() {
        return Err(RegistryError::NoMatch {
            chain: chain.to_string(),
        });
    }
    let index = random_index(rng, urls.len()).map_err(|e| {
        tracing::warn!(chain = %chain, error = %e, "random source failed");
        RegistryError::Random(e.to_string())
    })?;
    Ok(urls.swap_remove(index))
}

/// Uniform index in `0..len` by rejection sampling on a `u64`.
///
/// Goes through `try_fill_bytes` so an entropy failure is returned instead of
/// panicking inside the generator. `len` must be non-zero.
fn random_index<R: RngCore + ?Sized>(rng: &mut R, len: usize) -> Result<usize, rand::Error> {
    let len = len as u64;
    // largest multiple of `len` that fits; draws at or above it are biased
    let zone = u64::MAX - u64::MAX % len;
    loop {
        let mut buf = [0u8; 8];
        rng.try_fill_bytes(&mut buf)?;
        let draw = u64::from_le_bytes(buf);
        if draw < zone {
            return Ok((draw % len) as usize);
        }
    }
}
