//! Session-history synchronization.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::page::SessionHistory;

/// State stored with every history entry the engine creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Logical URL of the entry, as it was navigated to.
    pub url: String,
}

impl NavigationState {
    /// State for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// How a completed navigation touches the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// A click: push a new entry.
    Push,
    /// Back/forward: the browser already moved; push nothing.
    Replay,
}

/// Stamps the initial entry with its own URL so that back navigation to
/// the first page can be replayed.
pub fn record_initial<H: SessionHistory + ?Sized>(history: &mut H) {
    let href = history.location().to_string();
    history.replace_state(NavigationState::new(href.clone()), &href);
}

/// Records a completed soft navigation to `url`.
pub fn commit<H: SessionHistory + ?Sized>(history: &mut H, url: &str, mode: HistoryMode) {
    match mode {
        HistoryMode::Push => history.push_state(NavigationState::new(url), url),
        HistoryMode::Replay => {}
    }
}

/// One entry of a [`SessionStack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Address-bar URL of the entry.
    pub url: Url,
    /// State attached by `push_state`/`replace_state`.
    pub state: Option<NavigationState>,
}

/// A browser-style joint session history: a list of entries and a cursor.
/// Pushing drops every entry after the cursor.
#[derive(Debug, Clone)]
pub struct SessionStack {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl SessionStack {
    /// A stack holding the initial page load.
    pub fn new(url: Url) -> Self {
        Self {
            entries: vec![HistoryEntry { url, state: None }],
            index: 0,
        }
    }

    /// The entry under the cursor.
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a stack holds at least the initial entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Appends an entry after the cursor and moves onto it.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
    }

    /// Overwrites the entry under the cursor.
    pub fn replace(&mut self, entry: HistoryEntry) {
        self.entries[self.index] = entry;
    }

    /// Moves back one entry, returning it.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Moves forward one entry, returning it.
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(path: &str) -> HistoryEntry {
        HistoryEntry {
            url: Url::parse("https://example.com").unwrap().join(path).unwrap(),
            state: Some(NavigationState::new(path)),
        }
    }

    #[test]
    fn push_after_back_drops_forward_entries() {
        let mut stack = SessionStack::new(Url::parse("https://example.com/").unwrap());
        stack.push(entry("/a"));
        stack.push(entry("/b"));
        assert_eq!(stack.back().unwrap().url.path(), "/a");
        stack.push(entry("/c"));
        assert_eq!(stack.len(), 3);
        assert!(stack.forward().is_none());
        assert_eq!(stack.current().url.path(), "/c");
    }

    #[test]
    fn back_stops_at_first_entry() {
        let mut stack = SessionStack::new(Url::parse("https://example.com/").unwrap());
        assert!(stack.back().is_none());
        assert_eq!(stack.index(), 0);
    }

    #[test]
    fn state_serializes_as_url_object() {
        let json = serde_json::to_string(&NavigationState::new("/gallery.html")).unwrap();
        assert_eq!(json, r#"{"url":"/gallery.html"}"#);
    }
}
