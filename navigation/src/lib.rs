//! Soft page transitions for a static multi-page site.
//!
//! Same-origin link clicks are intercepted; the current page fades out, the
//! destination page is fetched and its primary content landmark is swapped
//! into the live document, the address bar and session history are updated,
//! collaborators are told to re-bind, and the page fades back in. Any
//! failure falls back to an ordinary full page load.
//!
//! The engine talks to the page through the [`Window`] trait and to the
//! origin through [`danis_net::Network`]. [`HeadlessPage`] is a `Window`
//! over parsed markup for tools and tests.
//!
//! # Entry Point
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use danis_navigation::{Anchor, HeadlessPage, NavigationConfig, SoftNavigator};
//! use danis_net::HttpNetwork;
//! use parking_lot::Mutex;
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let home = Url::parse("https://danisphotography.com/")?;
//! let window = Arc::new(Mutex::new(HeadlessPage::new(home, "<main></main>")));
//! let network = HttpNetwork::new(std::time::Duration::from_secs(10))?;
//! let navigator = SoftNavigator::install(NavigationConfig::default(), window, network)?;
//!
//! let outcome = navigator.click(&Anchor::new("/gallery.html")).await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`link`]: which clicks are intercepted
//! - [`transition`]: fade sequencing and the phase machine
//! - [`fetch`] and [`document`]: fetching and parsing destination pages
//! - [`swap`]: installing destination content into the live page
//! - [`history`]: session-history synchronization
//! - [`broadcast`]: the post-swap rebind event and hooks
//! - [`navigator`]: the engine tying these together

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod broadcast;
pub mod config;
pub mod document;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod headless;
pub mod history;
pub mod link;
pub mod navigator;
pub mod page;
pub mod swap;
pub mod transition;

pub use broadcast::{Broadcaster, ContentEvent, RebindHook};
pub use config::NavigationConfig;
pub use document::{DestinationDocument, MetaTag};
pub use error::{DomError, FetchError, NavigationError};
pub use headless::{HeadlessPage, PageEvent};
pub use history::{HistoryMode, NavigationState};
pub use link::{Anchor, Rejection};
pub use navigator::{NavigationOutcome, SoftNavigator};
pub use page::{Capabilities, Document, SessionHistory, SharedWindow, TransitionTarget, Window};
pub use swap::SwapMode;
pub use transition::TransitionPhase;
