//! Reinitialization broadcast after new content is installed.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

/// Event announced after every successful swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEvent {
    /// New content is in the page; re-bind listeners to it.
    SoftNavigationComplete,
}

impl ContentEvent {
    /// DOM event type name.
    pub const fn event_type(self) -> &'static str {
        match self {
            Self::SoftNavigationComplete => "soft-navigation-complete",
        }
    }
}

/// Well-known collaborators re-run after a swap, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RebindHook {
    /// Lazy image loading.
    LazyLoading,
    /// Lightbox/gallery binder.
    Lightbox,
    /// Accessibility labeling.
    Accessibility,
}

impl RebindHook {
    /// Invocation order.
    pub const ALL: [RebindHook; 3] = [
        RebindHook::LazyLoading,
        RebindHook::Lightbox,
        RebindHook::Accessibility,
    ];
}

type Hook = Arc<dyn Fn() + Send + Sync>;

const EVENT_CAPACITY: usize = 16;

/// Fan-out of [`ContentEvent`]s plus the optional rebind hooks.
///
/// Hooks must tolerate being called once per navigation against fresh
/// content; the broadcaster does not deduplicate them.
pub struct Broadcaster {
    events: broadcast::Sender<ContentEvent>,
    hooks: RwLock<BTreeMap<RebindHook, Hook>>,
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("subscribers", &self.events.receiver_count())
            .field("hooks", &self.hooks.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster {
    /// A broadcaster with no subscribers and no hooks.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            events,
            hooks: RwLock::new(BTreeMap::new()),
        }
    }

    /// Subscribes to content events.
    pub fn subscribe(&self) -> broadcast::Receiver<ContentEvent> {
        self.events.subscribe()
    }

    /// Installs (or replaces) a rebind hook.
    pub fn register(&self, hook: RebindHook, f: impl Fn() + Send + Sync + 'static) {
        self.hooks.write().insert(hook, Arc::new(f));
    }

    /// Announces new content: sends the event, then runs each present hook.
    /// Returns the number of hooks run.
    pub fn announce(&self) -> usize {
        let event = ContentEvent::SoftNavigationComplete;
        // No subscribers is fine.
        let _ = self.events.send(event);

        let hooks: Vec<Hook> = {
            let registered = self.hooks.read();
            RebindHook::ALL
                .iter()
                .filter_map(|h| registered.get(h).cloned())
                .collect()
        };
        for hook in &hooks {
            hook();
        }
        tracing::debug!(event = event.event_type(), hooks = hooks.len(), "content announced");
        hooks.len()
    }
}
