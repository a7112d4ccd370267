//! The offline worker.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use danis_net::{Network, NetworkError, Request, Response};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;
use url::Url;

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::interceptor::{self, Interception, PassThrough, ResponseSource};
use crate::lifecycle::{ActivationReport, ClientRegistry, ControlMessage, WorkerState};
use crate::storage::CacheStorage;

/// An offline worker for one site scope.
///
/// Owns the one current cache (`<prefix>-<version>`), seeds it on install,
/// evicts every other cache on activation and, once active, answers GET
/// requests stale-while-revalidate.
pub struct ServiceWorker<N> {
    scope: Url,
    config: WorkerConfig,
    network: Arc<N>,
    storage: Arc<CacheStorage>,
    clients: ClientRegistry,
    state: watch::Sender<WorkerState>,
    skip_waiting: AtomicBool,
    background: Mutex<JoinSet<bool>>,
    refreshed: AtomicUsize,
}

impl<N> std::fmt::Debug for ServiceWorker<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceWorker")
            .field("scope", &self.scope.as_str())
            .field("cache", &self.config.cache_name())
            .field("state", &*self.state.borrow())
            .field("pending_revalidations", &self.background.lock().len())
            .finish_non_exhaustive()
    }
}

impl<N: Network + 'static> ServiceWorker<N> {
    /// A freshly registered worker for `scope` with its own empty storage.
    pub fn new(scope: Url, config: WorkerConfig, network: N) -> Self {
        Self::with_storage(scope, config, network, Arc::new(CacheStorage::new()))
    }

    /// A worker sharing `storage` with earlier workers of the same scope,
    /// which is how a version rollover finds the caches it must evict.
    pub fn with_storage(
        scope: Url,
        config: WorkerConfig,
        network: N,
        storage: Arc<CacheStorage>,
    ) -> Self {
        let (state, _) = watch::channel(WorkerState::Parsed);
        Self {
            scope,
            config,
            network: Arc::new(network),
            storage,
            clients: ClientRegistry::new(),
            state,
            skip_waiting: AtomicBool::new(false),
            background: Mutex::new(JoinSet::new()),
            refreshed: AtomicUsize::new(0),
        }
    }

    /// Scope URL.
    pub fn scope(&self) -> &Url {
        &self.scope
    }

    /// Worker configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// The network this worker reaches the origin through.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Cache storage.
    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    /// Client pages.
    pub fn clients(&self) -> &ClientRegistry {
        &self.clients
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    /// Observes lifecycle changes.
    pub fn watch_state(&self) -> watch::Receiver<WorkerState> {
        self.state.subscribe()
    }

    /// True once skip-waiting was requested.
    pub fn is_waiting_skipped(&self) -> bool {
        self.skip_waiting.load(Ordering::Acquire)
    }

    /// Requests activation as soon as installed.
    pub fn skip_waiting(&self) {
        tracing::debug!("skip waiting requested");
        self.skip_waiting.store(true, Ordering::Release);
    }

    /// Moves from `from` to `to`, or reports the state actually found.
    fn advance(&self, from: WorkerState, to: WorkerState) -> Result<(), WorkerError> {
        let mut actual = from;
        let moved = self.state.send_if_modified(|state| {
            actual = *state;
            if *state == from {
                *state = to;
                true
            } else {
                false
            }
        });
        if moved {
            tracing::trace!(?from, ?to, "worker state");
            Ok(())
        } else {
            Err(WorkerError::InvalidState {
                expected: from,
                actual,
            })
        }
    }

    fn manifest_requests(&self) -> Result<Vec<Request>, WorkerError> {
        self.config
            .manifest
            .iter()
            .map(|path| {
                self.scope
                    .join(path)
                    .map(Request::get)
                    .map_err(|err| {
                        WorkerError::Network(NetworkError::InvalidUrl {
                            url: path.clone(),
                            reason: err.to_string(),
                        })
                    })
            })
            .collect()
    }

    /// Seeds the current cache with the whole manifest.
    ///
    /// Any failure leaves the cache without manifest entries and returns the
    /// worker to [`WorkerState::Parsed`], so install can be retried. On
    /// success the worker is [`WorkerState::Installed`] and, when configured,
    /// has requested skip-waiting.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::InvalidState`] unless the worker is `Parsed`,
    /// and [`WorkerError::Install`] when precaching fails.
    pub async fn install(&self) -> Result<(), WorkerError> {
        self.advance(WorkerState::Parsed, WorkerState::Installing)?;
        let name = self.config.cache_name();
        tracing::info!(cache = %name, assets = self.config.manifest.len(), "installing");

        let seeded = match self.manifest_requests() {
            Ok(requests) => {
                let cache = self.storage.open(&name);
                cache.add_all(&*self.network, &requests).await
            }
            Err(err) => Err(err),
        };

        match seeded {
            Ok(count) => {
                self.state.send_replace(WorkerState::Installed);
                tracing::info!(cache = %name, entries = count, "installed");
                if self.config.skip_waiting_on_install {
                    self.skip_waiting();
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(cache = %name, error = %err, "precache failed");
                self.state.send_replace(WorkerState::Parsed);
                Err(WorkerError::Install {
                    cache: name,
                    source: Box::new(err),
                })
            }
        }
    }

    /// Deletes every cache but the current one, claims all open clients and
    /// starts intercepting.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::InvalidState`] unless the worker is `Installed`.
    pub fn activate(&self) -> Result<ActivationReport, WorkerError> {
        self.advance(WorkerState::Installed, WorkerState::Activating)?;
        let current = self.config.cache_name();

        let mut report = ActivationReport::default();
        for name in self.storage.keys() {
            if name != current && self.storage.delete(&name) {
                tracing::info!(cache = %name, "deleted stale cache");
                report.evicted.push(name);
            }
        }
        report.claimed = self.clients.claim();

        self.state.send_replace(WorkerState::Activated);
        tracing::info!(
            cache = %current,
            evicted = report.evicted.len(),
            claimed = report.claimed,
            "activated"
        );
        Ok(report)
    }

    /// Installs, then activates when skip-waiting was requested. Returns the
    /// activation report, or `None` when the worker is left waiting.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::install`] and [`Self::activate`] failures.
    pub async fn start(&self) -> Result<Option<ActivationReport>, WorkerError> {
        self.install().await?;
        if self.is_waiting_skipped() {
            self.activate().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Marks the worker as replaced; it stops intercepting.
    ///
    /// A worker sharing its [`CacheStorage`] with a newer version retires
    /// itself on its next fetch once that version's activation has evicted
    /// its cache. Call this to retire it sooner, e.g. on unregistration.
    pub fn retire(&self) {
        self.state.send_replace(WorkerState::Redundant);
        tracing::info!(scope = %self.scope, "worker retired");
    }

    /// Handles a message posted by a page.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Message`] when `json` is malformed.
    pub fn handle_message(&self, json: &str) -> Result<ControlMessage, WorkerError> {
        let message = ControlMessage::parse(json)?;
        match message {
            ControlMessage::SkipWaiting => self.skip_waiting(),
            ControlMessage::Unknown => tracing::debug!(json, "ignoring control message"),
        }
        Ok(message)
    }

    /// Offers `request` to the worker.
    ///
    /// # Errors
    ///
    /// On a cache miss with the origin unreachable: for HTML requests
    /// [`WorkerError::NoFallback`] when the offline document is not cached,
    /// otherwise the [`WorkerError::Network`] failure itself.
    pub async fn handle_fetch(&self, request: &Request) -> Result<Interception, WorkerError> {
        if self.state() != WorkerState::Activated {
            return Ok(Interception::PassThrough(PassThrough::Inactive));
        }
        if !self.storage.has(&self.config.cache_name()) {
            if self.advance(WorkerState::Activated, WorkerState::Redundant).is_ok() {
                tracing::info!(
                    cache = %self.config.cache_name(),
                    "cache evicted by a newer version, worker retired"
                );
            }
            return Ok(Interception::PassThrough(PassThrough::Superseded));
        }
        if let Some(reason) = interceptor::pass_through(request, &self.config) {
            tracing::trace!(url = %request.url, ?reason, "not intercepted");
            return Ok(Interception::PassThrough(reason));
        }

        if let Some(cached) = self.storage.match_request(request) {
            tracing::debug!(url = %request.url, "cache hit");
            self.spawn_revalidation(request.clone());
            return Ok(Interception::Respond {
                response: cached,
                source: ResponseSource::Cache,
            });
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    self.storage
                        .open(&self.config.cache_name())
                        .put(request, response.clone())?;
                }
                Ok(Interception::Respond {
                    response,
                    source: ResponseSource::Network,
                })
            }
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "fetch failed");
                if !request.accepts("text/html") {
                    return Err(err.into());
                }
                match self.offline_fallback() {
                    Some(response) => Ok(Interception::Respond {
                        response,
                        source: ResponseSource::OfflineFallback,
                    }),
                    None => Err(WorkerError::NoFallback {
                        url: request.url.to_string(),
                        source: err,
                    }),
                }
            }
        }
    }

    fn offline_fallback(&self) -> Option<Response> {
        let url = self.scope.join(&self.config.offline_fallback).ok()?;
        self.storage.match_request(&Request::get(url))
    }

    fn spawn_revalidation(&self, request: Request) {
        let network = Arc::clone(&self.network);
        let cache = self.storage.open(&self.config.cache_name());
        let span = tracing::debug_span!("revalidate", url = %request.url);
        let mut tasks = self.background.lock();
        while let Some(joined) = tasks.try_join_next() {
            self.collect(joined);
        }
        tasks.spawn(
            async move { interceptor::revalidate(&*network, &cache, request).await }
                .instrument(span),
        );
    }

    fn collect(&self, joined: Result<bool, JoinError>) {
        match joined {
            Ok(true) => {
                self.refreshed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(err) => tracing::debug!(error = %err, "revalidation task aborted"),
        }
    }

    /// Number of revalidations still running or finished but not yet
    /// collected. Finished tasks are collected whenever a new one starts.
    pub fn pending_revalidations(&self) -> usize {
        self.background.lock().len()
    }

    /// Waits for every background revalidation started so far. Returns how
    /// many refreshed their entry since the previous call.
    pub async fn settle(&self) -> usize {
        let mut tasks = std::mem::take(&mut *self.background.lock());
        while let Some(joined) = tasks.join_next().await {
            self.collect(joined);
        }
        self.refreshed.swap(0, Ordering::Relaxed)
    }
}

/// Routes fetches through the worker, the way a controlled page's fetches
/// are. Requests the worker passes through go straight to the network.
#[async_trait]
impl<N: Network + 'static> Network for ServiceWorker<N> {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        match self.handle_fetch(request).await {
            Ok(Interception::Respond { response, .. }) => Ok(response),
            Ok(Interception::PassThrough(_)) => self.network.fetch(request).await,
            Err(WorkerError::Network(err)) | Err(WorkerError::NoFallback { source: err, .. }) => {
                Err(err)
            }
            Err(other) => Err(NetworkError::unreachable(
                request.url.as_str(),
                other.to_string(),
            )),
        }
    }
}
