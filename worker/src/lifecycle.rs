//! Worker lifecycle: states, control messages and client pages.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::WorkerError;

/// Where a worker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerState {
    /// Registered, not yet installed (also the state after a failed install).
    Parsed,
    /// Precaching the manifest.
    Installing,
    /// Installed and waiting to activate.
    Installed,
    /// Evicting stale caches and claiming clients.
    Activating,
    /// Intercepting fetches.
    Activated,
    /// Replaced by a newer worker.
    Redundant,
}

/// What an activation cleaned up and took over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    /// Stale cache names deleted, in the order they were found.
    pub evicted: Vec<String>,
    /// Number of client pages claimed.
    pub claimed: usize,
}

/// Messages a page can post to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Activate as soon as installed instead of waiting.
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    /// Any other message type.
    #[serde(other)]
    Unknown,
}

impl ControlMessage {
    /// Parses a posted JSON message.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Message`] when `json` is not an object with a
    /// string `type` field.
    pub fn parse(json: &str) -> Result<Self, WorkerError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Identifies an open client page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(u64);

/// Open client pages and whether the worker controls them.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    next: AtomicU64,
    clients: RwLock<BTreeMap<ClientId, bool>>,
}

impl ClientRegistry {
    /// No open clients.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly opened page. Pages start uncontrolled.
    pub fn open(&self) -> ClientId {
        let id = ClientId(self.next.fetch_add(1, Ordering::Relaxed));
        self.clients.write().insert(id, false);
        id
    }

    /// Forgets a closed page.
    pub fn close(&self, id: ClientId) {
        self.clients.write().remove(&id);
    }

    /// Number of open pages.
    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    /// True when no page is open.
    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }

    /// True when `id` is open and controlled.
    pub fn is_controlled(&self, id: ClientId) -> bool {
        self.clients.read().get(&id).copied().unwrap_or(false)
    }

    /// Takes control of every open page. Returns how many pages that is.
    pub fn claim(&self) -> usize {
        let mut clients = self.clients.write();
        for controlled in clients.values_mut() {
            *controlled = true;
        }
        clients.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn skip_waiting_message_parses() {
        assert_eq!(
            ControlMessage::parse(r#"{"type":"SKIP_WAITING"}"#).unwrap(),
            ControlMessage::SkipWaiting
        );
    }

    #[test]
    fn unknown_types_are_tolerated() {
        assert_eq!(
            ControlMessage::parse(r#"{"type":"PING","payload":1}"#).unwrap(),
            ControlMessage::Unknown
        );
    }

    #[test]
    fn malformed_messages_are_errors() {
        assert!(matches!(
            ControlMessage::parse("SKIP_WAITING"),
            Err(WorkerError::Message(_))
        ));
        assert!(ControlMessage::parse(r#"{"kind":"SKIP_WAITING"}"#).is_err());
    }

    #[test]
    fn claim_controls_every_open_client() {
        let clients = ClientRegistry::new();
        let a = clients.open();
        let b = clients.open();
        clients.close(b);
        assert!(!clients.is_controlled(a));

        assert_eq!(clients.claim(), 1);
        assert!(clients.is_controlled(a));
        assert!(!clients.is_controlled(b));
    }
}
