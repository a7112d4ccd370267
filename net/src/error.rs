//! Transport-level failures.

use thiserror::Error;

/// A request that never produced a response.
///
/// Non-success HTTP statuses are *not* errors at this layer; they arrive as
/// ordinary [`crate::Response`] values and each caller decides what they mean.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The origin could not be reached (DNS, connection refused, offline).
    #[error("network unreachable for {url}: {reason}")]
    Unreachable {
        /// Requested URL.
        url: String,
        /// Underlying transport message.
        reason: String,
    },

    /// The request did not complete within the configured deadline.
    #[error("request to {url} timed out")]
    Timeout {
        /// Requested URL.
        url: String,
    },

    /// The URL could not be turned into a request.
    #[error("invalid request url {url}: {reason}")]
    InvalidUrl {
        /// Offending URL text.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The response head arrived but the body could not be read.
    #[error("failed to read response body from {url}: {reason}")]
    Body {
        /// Requested URL.
        url: String,
        /// Underlying transport message.
        reason: String,
    },
}

impl NetworkError {
    /// Shorthand for an [`NetworkError::Unreachable`] error.
    pub fn unreachable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreachable {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
