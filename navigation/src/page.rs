//! The live page, as the engine sees it.
//!
//! A browser embedding implements these traits over the real DOM; the
//! [`crate::headless::HeadlessPage`] implements them over a parsed document
//! for tools and tests.

use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use crate::document::MetaTag;
use crate::error::DomError;
use crate::history::NavigationState;

/// Content operations on the live document.
pub trait Document {
    /// Current document title.
    fn title(&self) -> String;

    /// Replaces the document title.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the title cannot be written.
    fn set_title(&mut self, title: &str) -> Result<(), DomError>;

    /// True when the document contains the `landmark` element.
    fn has_landmark(&self, landmark: &str) -> bool;

    /// Replaces the inner markup of the `landmark` element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::MissingElement`] if there is no such element.
    fn replace_landmark(&mut self, landmark: &str, html: &str) -> Result<(), DomError>;

    /// Replaces the inner markup of `<body>`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the body cannot be written.
    fn replace_body(&mut self, html: &str) -> Result<(), DomError>;

    /// `content` of a metadata tag, or `None` when the tag is absent.
    fn meta_content(&self, tag: MetaTag) -> Option<String>;

    /// Sets `content` of an existing metadata tag.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::MissingElement`] if the tag is absent.
    fn set_meta_content(&mut self, tag: MetaTag, content: &str) -> Result<(), DomError>;

    /// Jumps to the top of the viewport without animation.
    fn scroll_to_top(&mut self);
}

/// The element whose opacity carries the page transition (`<body>`).
pub trait TransitionTarget {
    /// Sets or clears the CSS `transition` property.
    fn set_transition(&mut self, transition: Option<&str>);

    /// Sets the opacity (0.0 to 1.0).
    fn set_opacity(&mut self, opacity: f32);

    /// Current opacity.
    fn opacity(&self) -> f32;
}

/// Session history and the address bar.
pub trait SessionHistory {
    /// Current address-bar URL.
    fn location(&self) -> Url;

    /// State of the current history entry.
    fn state(&self) -> Option<NavigationState>;

    /// Pushes a new entry and shows `url` in the address bar.
    fn push_state(&mut self, state: NavigationState, url: &str);

    /// Overwrites the current entry.
    fn replace_state(&mut self, state: NavigationState, url: &str);
}

/// Which browser APIs the window offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// `fetch` is available.
    pub fetch: bool,
    /// `history.pushState` is available.
    pub history: bool,
}

impl Capabilities {
    /// A fully capable window.
    pub const FULL: Capabilities = Capabilities {
        fetch: true,
        history: true,
    };

    /// True when soft navigation can run.
    pub const fn is_supported(self) -> bool {
        self.fetch && self.history
    }
}

/// Everything the engine needs from the page.
pub trait Window: Document + TransitionTarget + SessionHistory {
    /// Available browser APIs.
    fn capabilities(&self) -> Capabilities;

    /// Hard navigation: hands `url` to the browser for a full page load.
    fn assign(&mut self, url: &str);
}

/// A window shared between the engine and its embedder. The lock is never
/// held across an `.await`.
pub type SharedWindow<W> = Arc<Mutex<W>>;
