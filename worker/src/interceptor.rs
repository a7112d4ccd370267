//! Fetch interception: which requests the worker handles, and the
//! background revalidation it starts on a cache hit.

use danis_net::{Method, Network, Request, Response};

use crate::config::WorkerConfig;
use crate::storage::Cache;

/// Why a request was left to the network untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassThrough {
    /// The worker is not active.
    Inactive,
    /// A newer version activated and evicted this worker's cache; the
    /// worker is now redundant.
    Superseded,
    /// Not a GET.
    Method(Method),
    /// URL contains a third-party analytics marker.
    Marker(String),
    /// Browser-extension scheme.
    ExtensionScheme(String),
}

/// Where an intercepted response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Served from cache; a revalidation was started.
    Cache,
    /// Fetched from the network.
    Network,
    /// The network failed; the offline document was served instead.
    OfflineFallback,
}

/// Outcome of offering a request to the worker.
#[derive(Debug, Clone)]
pub enum Interception {
    /// Not handled; the caller fetches as if no worker were installed.
    PassThrough(PassThrough),
    /// Handled; respond with this.
    Respond {
        /// Response for the page.
        response: Response,
        /// Where it came from.
        source: ResponseSource,
    },
}

impl Interception {
    /// The response, if the worker answered.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Respond { response, .. } => Some(response),
            Self::PassThrough(_) => None,
        }
    }

    /// The response source, if the worker answered.
    pub fn source(&self) -> Option<ResponseSource> {
        match self {
            Self::Respond { source, .. } => Some(*source),
            Self::PassThrough(_) => None,
        }
    }
}

/// Applies the pass-through rules to `request`. `None` means the worker
/// handles it.
pub fn pass_through(request: &Request, config: &WorkerConfig) -> Option<PassThrough> {
    if request.method != Method::Get {
        return Some(PassThrough::Method(request.method));
    }
    let scheme = request.url.scheme();
    if let Some(ext) = config.extension_schemes.iter().find(|s| s.as_str() == scheme) {
        return Some(PassThrough::ExtensionScheme(ext.clone()));
    }
    let url = request.url.as_str();
    config
        .passthrough_markers
        .iter()
        .find(|marker| url.contains(marker.as_str()))
        .map(|marker| PassThrough::Marker(marker.clone()))
}

/// Refetches `request` and overwrites its entry in `cache` when the origin
/// answers 200. Any other outcome leaves the stale entry in place.
///
/// Returns true when the entry was refreshed.
pub async fn revalidate<N: Network + ?Sized>(network: &N, cache: &Cache, request: Request) -> bool {
    match network.fetch(&request).await {
        Ok(response) if response.is_cacheable() => match cache.put(&request, response) {
            Ok(()) => {
                tracing::debug!(url = %request.url, cache = cache.name(), "cache entry revalidated");
                true
            }
            Err(err) => {
                tracing::debug!(url = %request.url, error = %err, "revalidated response not stored");
                false
            }
        },
        Ok(response) => {
            tracing::debug!(url = %request.url, status = response.status, "revalidation skipped");
            false
        }
        Err(err) => {
            tracing::debug!(url = %request.url, error = %err, "revalidation failed, keeping stale entry");
            false
        }
    }
}
