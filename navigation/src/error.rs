//! Error types for the soft-navigation engine.
//!
//! None of these reach the visitor: a fetch or swap failure degrades to a
//! hard navigation, and an unsupported window leaves native navigation in
//! place.

use danis_net::NetworkError;
use thiserror::Error;

use crate::page::Capabilities;

/// A failure to mutate or serialize the live or parsed document.
#[derive(Debug, Error)]
pub enum DomError {
    /// An element the operation needs is not in the document.
    #[error("document has no <{0}> element")]
    MissingElement(String),

    /// The node is not an element.
    #[error("node is not an element")]
    NotAnElement,

    /// Markup could not be serialized.
    #[error("failed to serialize markup: {0}")]
    Serialize(String),
}

/// A destination page that could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The origin answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// No response at all.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Top-level engine error.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The window lacks fetch or the History API; soft navigation stays off.
    #[error("soft navigation not supported (fetch: {}, history: {})", .0.fetch, .0.history)]
    Unsupported(Capabilities),

    /// The destination could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The swap failed part-way.
    #[error(transparent)]
    Dom(#[from] DomError),
}
