//! The soft-navigation engine: filter → fade out → fetch + swap → history →
//! broadcast → fade in.

use std::sync::atomic::{AtomicBool, Ordering};

use danis_net::Network;
use tokio::sync::{broadcast, watch, Mutex as FlightLock};
use tracing::Instrument;
use url::Url;

use crate::broadcast::{Broadcaster, ContentEvent, RebindHook};
use crate::config::NavigationConfig;
use crate::error::NavigationError;
use crate::fetch::PageFetcher;
use crate::history::{self, HistoryMode, NavigationState};
use crate::link::{self, Anchor};
use crate::page::{SharedWindow, Window};
use crate::swap::{self, SwapMode};
use crate::transition::{TransitionController, TransitionGuard, TransitionPhase};

/// How a navigation trigger was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Not intercepted; the browser navigates natively.
    Native,
    /// Soft navigation completed and the engine is back to idle.
    Completed(SwapMode),
    /// Soft navigation failed; a hard navigation was dispatched instead.
    HardNavigation,
    /// A click arrived while another navigation was in flight and was
    /// dropped (its default action stays prevented).
    Busy,
    /// Nothing to do (a `popstate` without engine state, or the page is
    /// already unloading after a hard navigation).
    Ignored,
}

/// Soft-navigation engine bound to one window.
pub struct SoftNavigator<W, N> {
    config: NavigationConfig,
    window: SharedWindow<W>,
    fetcher: PageFetcher<N>,
    controller: TransitionController,
    broadcaster: Broadcaster,
    flight: FlightLock<()>,
    departed: AtomicBool,
}

impl<W, N> std::fmt::Debug for SoftNavigator<W, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftNavigator")
            .field("config", &self.config)
            .field("phase", &self.controller.phase())
            .field("departed", &self.departed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl<W: Window, N: Network> SoftNavigator<W, N> {
    /// Enables soft navigation on `window`.
    ///
    /// Stamps the current history entry with its URL so the first page can
    /// be returned to with the back button.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Unsupported`] when the window lacks fetch
    /// or the History API; native navigation is then left untouched.
    pub fn install(
        config: NavigationConfig,
        window: SharedWindow<W>,
        network: N,
    ) -> Result<Self, NavigationError> {
        let capabilities = window.lock().capabilities();
        if !capabilities.is_supported() {
            tracing::info!(?capabilities, "soft navigation not supported in this window");
            return Err(NavigationError::Unsupported(capabilities));
        }

        history::record_initial(&mut *window.lock());

        let fetcher = PageFetcher::new(network, config.landmark.clone());
        let controller = TransitionController::new(config.transition_duration());
        tracing::info!(
            duration_ms = config.transition_duration_ms,
            landmark = %config.landmark,
            "soft page transitions enabled"
        );

        Ok(Self {
            config,
            window,
            fetcher,
            controller,
            broadcaster: Broadcaster::new(),
            flight: FlightLock::new(()),
            departed: AtomicBool::new(false),
        })
    }

    /// The window this engine drives.
    pub fn window(&self) -> &SharedWindow<W> {
        &self.window
    }

    /// Engine configuration.
    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Current transition phase.
    pub fn phase(&self) -> TransitionPhase {
        self.controller.phase()
    }

    /// Observes transition phase changes.
    pub fn watch_phase(&self) -> watch::Receiver<TransitionPhase> {
        self.controller.watch()
    }

    /// Subscribes to "new content installed" events.
    pub fn subscribe(&self) -> broadcast::Receiver<ContentEvent> {
        self.broadcaster.subscribe()
    }

    /// Installs a rebind hook run after every swap.
    pub fn register_hook(&self, hook: RebindHook, f: impl Fn() + Send + Sync + 'static) {
        self.broadcaster.register(hook, f);
    }

    /// True once a hard navigation has been dispatched.
    pub fn has_departed(&self) -> bool {
        self.departed.load(Ordering::Acquire)
    }

    /// True when a click on `anchor` would be intercepted; the embedder
    /// prevents the default action exactly when this holds.
    pub fn intercepts(&self, anchor: &Anchor) -> bool {
        if self.has_departed() {
            return false;
        }
        let location = self.window.lock().location();
        link::should_intercept(anchor, &location, &self.config)
    }

    /// Handles a click on `anchor`.
    ///
    /// Resolves once the page is idle again, or once a hard navigation has
    /// been dispatched. A click during an in-flight navigation is dropped.
    pub async fn click(&self, anchor: &Anchor) -> NavigationOutcome {
        if self.has_departed() {
            return NavigationOutcome::Native;
        }
        let location = self.window.lock().location();
        let destination = match link::classify(anchor, &location, &self.config) {
            Ok(url) => url,
            Err(reason) => {
                tracing::trace!(href = ?anchor.href, ?reason, "link left to native navigation");
                return NavigationOutcome::Native;
            }
        };
        let Some(href) = anchor.href.as_deref() else {
            return NavigationOutcome::Native;
        };

        let Ok(_flight) = self.flight.try_lock() else {
            tracing::debug!(href, "navigation already in flight, click dropped");
            return NavigationOutcome::Busy;
        };
        self.run(href, destination, HistoryMode::Push).await
    }

    /// Handles a `popstate` carrying `state`.
    ///
    /// Replays wait for any in-flight navigation: the browser has already
    /// moved the history cursor, so the content must follow.
    pub async fn pop_state(&self, state: Option<NavigationState>) -> NavigationOutcome {
        let Some(state) = state else {
            return NavigationOutcome::Ignored;
        };
        let _flight = self.flight.lock().await;
        if self.has_departed() {
            return NavigationOutcome::Ignored;
        }
        let location = self.window.lock().location();
        let Ok(destination) = location.join(&state.url) else {
            tracing::debug!(url = %state.url, "history state url does not resolve");
            return NavigationOutcome::Ignored;
        };
        self.run(&state.url, destination, HistoryMode::Replay).await
    }

    /// Soft-navigates to `href` programmatically, queued behind any
    /// in-flight navigation.
    pub async fn navigate(&self, href: &str) -> NavigationOutcome {
        let _flight = self.flight.lock().await;
        if self.has_departed() {
            return NavigationOutcome::Ignored;
        }
        let location = self.window.lock().location();
        let Ok(destination) = location.join(href) else {
            return NavigationOutcome::Ignored;
        };
        self.run(href, destination, HistoryMode::Push).await
    }

    /// One full transition. Callers hold the flight lock.
    async fn run(&self, href: &str, destination: Url, mode: HistoryMode) -> NavigationOutcome {
        let span = tracing::debug_span!("soft_navigation", href, ?mode);
        self.transition(href, destination, mode)
            .instrument(span)
            .await
    }

    async fn transition(
        &self,
        href: &str,
        destination: Url,
        mode: HistoryMode,
    ) -> NavigationOutcome {
        let guard = TransitionGuard::acquire(&self.controller, &*self.window);
        self.controller.fade_out(&self.window).await;

        self.controller.enter(TransitionPhase::Swapping);
        let swapped = match self.fetcher.fetch(&destination).await {
            Ok(document) => {
                let mut window = self.window.lock();
                swap::swap(&mut *window, &document, &self.config.landmark)
                    .map_err(NavigationError::from)
            }
            Err(err) => Err(NavigationError::from(err)),
        };

        let swap_mode = match swapped {
            Ok(swap_mode) => swap_mode,
            Err(err) => {
                tracing::warn!(error = %err, href, "soft navigation failed, loading page normally");
                self.departed.store(true, Ordering::Release);
                self.window.lock().assign(href);
                drop(guard);
                return NavigationOutcome::HardNavigation;
            }
        };

        self.broadcaster.announce();
        history::commit(&mut *self.window.lock(), href, mode);

        self.controller.fade_in(&self.window).await;
        guard.release();
        tracing::debug!(?swap_mode, "soft navigation complete");
        NavigationOutcome::Completed(swap_mode)
    }
}
