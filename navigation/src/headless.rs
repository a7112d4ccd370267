//! A [`Window`] over a parsed HTML document, for tools and tests.
//!
//! The page keeps its markup as a string and re-parses it for each
//! operation, which keeps the type `Send` and cheap to share behind a
//! [`crate::SharedWindow`]. Every observable change is appended to a
//! journal so callers can check what happened and in which order.

use url::Url;

use crate::document::MetaTag;
use crate::dom::Dom;
use crate::error::DomError;
use crate::history::{HistoryEntry, NavigationState, SessionStack};
use crate::page::{Capabilities, Document, SessionHistory, TransitionTarget, Window};

/// One observable change to a [`HeadlessPage`].
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// `transition` style set or cleared.
    Transition(Option<String>),
    /// Opacity changed.
    Opacity(f32),
    /// Title replaced.
    Title(String),
    /// Landmark content replaced.
    LandmarkReplaced,
    /// Body content replaced.
    BodyReplaced,
    /// Metadata tag updated.
    Meta(MetaTag, String),
    /// Viewport reset to the top.
    ScrolledToTop,
    /// History entry pushed.
    Pushed(String),
    /// History entry replaced.
    Replaced(String),
    /// Hard navigation requested.
    Assigned(String),
}

/// An in-memory page with session history.
#[derive(Debug, Clone)]
pub struct HeadlessPage {
    html: String,
    history: SessionStack,
    capabilities: Capabilities,
    opacity: f32,
    transition: Option<String>,
    scroll_y: u32,
    assigned: Option<Url>,
    journal: Vec<PageEvent>,
}

impl HeadlessPage {
    /// A page showing `html`, loaded from `url`.
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            history: SessionStack::new(url),
            capabilities: Capabilities::FULL,
            opacity: 1.0,
            transition: None,
            scroll_y: 0,
            assigned: None,
            journal: Vec::new(),
        }
    }

    /// Overrides the advertised capabilities, builder style.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Current markup.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Inner markup of the first `tag` element.
    pub fn inner_html(&self, tag: &str) -> Option<String> {
        let dom = Dom::parse(&self.html);
        dom.find(tag).and_then(|n| Dom::inner_html(&n).ok())
    }

    /// Current `transition` style.
    pub fn transition(&self) -> Option<&str> {
        self.transition.as_deref()
    }

    /// Vertical scroll offset.
    pub fn scroll_y(&self) -> u32 {
        self.scroll_y
    }

    /// Simulates the visitor scrolling.
    pub fn scroll_to(&mut self, y: u32) {
        self.scroll_y = y;
    }

    /// Destination of the last hard navigation, if one was requested.
    pub fn assigned(&self) -> Option<&Url> {
        self.assigned.as_ref()
    }

    /// Session history.
    pub fn history(&self) -> &SessionStack {
        &self.history
    }

    /// Everything that happened to the page, oldest first.
    pub fn journal(&self) -> &[PageEvent] {
        &self.journal
    }

    /// Empties the journal.
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Browser back button: moves the history cursor and returns the state
    /// the `popstate` event carries, or `None` at the first entry.
    pub fn go_back(&mut self) -> Option<Option<NavigationState>> {
        self.history.back().map(|e| e.state.clone())
    }

    /// Browser forward button, like [`Self::go_back`].
    pub fn go_forward(&mut self) -> Option<Option<NavigationState>> {
        self.history.forward().map(|e| e.state.clone())
    }

    fn edit(&mut self, f: impl FnOnce(&Dom) -> Result<(), DomError>) -> Result<(), DomError> {
        let dom = Dom::parse(&self.html);
        f(&dom)?;
        self.html = dom.to_html()?;
        Ok(())
    }

    fn resolve(&self, url: &str) -> Url {
        let current = &self.history.current().url;
        current.join(url).unwrap_or_else(|_| current.clone())
    }
}

impl Document for HeadlessPage {
    fn title(&self) -> String {
        Dom::parse(&self.html).title()
    }

    fn set_title(&mut self, title: &str) -> Result<(), DomError> {
        self.edit(|dom| dom.set_title(title))?;
        self.journal.push(PageEvent::Title(title.to_string()));
        Ok(())
    }

    fn has_landmark(&self, landmark: &str) -> bool {
        Dom::parse(&self.html).find(landmark).is_some()
    }

    fn replace_landmark(&mut self, landmark: &str, html: &str) -> Result<(), DomError> {
        self.edit(|dom| {
            let node = dom
                .find(landmark)
                .ok_or_else(|| DomError::MissingElement(landmark.to_string()))?;
            Dom::set_inner_html(&node, html);
            Ok(())
        })?;
        self.journal.push(PageEvent::LandmarkReplaced);
        Ok(())
    }

    fn replace_body(&mut self, html: &str) -> Result<(), DomError> {
        self.edit(|dom| {
            let body = dom
                .find("body")
                .ok_or_else(|| DomError::MissingElement("body".to_string()))?;
            Dom::set_inner_html(&body, html);
            Ok(())
        })?;
        self.journal.push(PageEvent::BodyReplaced);
        Ok(())
    }

    fn meta_content(&self, tag: MetaTag) -> Option<String> {
        let dom = Dom::parse(&self.html);
        dom.find_meta(tag)
            .map(|node| Dom::attribute(&node, "content").unwrap_or_default())
    }

    fn set_meta_content(&mut self, tag: MetaTag, content: &str) -> Result<(), DomError> {
        self.edit(|dom| {
            let node = dom
                .find_meta(tag)
                .ok_or_else(|| DomError::MissingElement(format!("meta {}", tag.selector().1)))?;
            Dom::set_attribute(&node, "content", content)
        })?;
        self.journal.push(PageEvent::Meta(tag, content.to_string()));
        Ok(())
    }

    fn scroll_to_top(&mut self) {
        self.scroll_y = 0;
        self.journal.push(PageEvent::ScrolledToTop);
    }
}

impl TransitionTarget for HeadlessPage {
    fn set_transition(&mut self, transition: Option<&str>) {
        self.transition = transition.map(str::to_string);
        self.journal.push(PageEvent::Transition(self.transition.clone()));
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.journal.push(PageEvent::Opacity(opacity));
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}

impl SessionHistory for HeadlessPage {
    fn location(&self) -> Url {
        self.history.current().url.clone()
    }

    fn state(&self) -> Option<NavigationState> {
        self.history.current().state.clone()
    }

    fn push_state(&mut self, state: NavigationState, url: &str) {
        let url = self.resolve(url);
        self.journal.push(PageEvent::Pushed(state.url.clone()));
        self.history.push(HistoryEntry {
            url,
            state: Some(state),
        });
    }

    fn replace_state(&mut self, state: NavigationState, url: &str) {
        let url = self.resolve(url);
        self.journal.push(PageEvent::Replaced(state.url.clone()));
        self.history.replace(HistoryEntry {
            url,
            state: Some(state),
        });
    }
}

impl Window for HeadlessPage {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn assign(&mut self, url: &str) {
        let url = self.resolve(url);
        self.journal.push(PageEvent::Assigned(url.to_string()));
        self.assigned = Some(url);
    }
}
