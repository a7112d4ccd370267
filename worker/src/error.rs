//! Worker error types.

use danis_net::{Method, NetworkError};
use thiserror::Error;

use crate::lifecycle::WorkerState;

/// Errors raised by the offline worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Precaching failed; nothing from the manifest was stored.
    #[error("install of cache `{cache}` failed")]
    Install {
        /// Cache being seeded.
        cache: String,
        /// First failure met while fetching the manifest.
        #[source]
        source: Box<WorkerError>,
    },

    /// A lifecycle step was called out of order.
    #[error("worker is {actual:?}, expected {expected:?}")]
    InvalidState {
        /// State the step requires.
        expected: WorkerState,
        /// State the worker was in.
        actual: WorkerState,
    },

    /// The origin could not be reached.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The origin answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status.
        status: u16,
    },

    /// An HTML request failed and no offline document is cached.
    #[error("{url} is unreachable and no offline fallback is cached")]
    NoFallback {
        /// Requested URL.
        url: String,
        /// Network failure behind the fallback attempt.
        #[source]
        source: NetworkError,
    },

    /// Only GET responses go into the cache.
    #[error("{method} responses cannot be cached")]
    MethodNotCacheable {
        /// Rejected method.
        method: Method,
    },

    /// A control message was not valid JSON.
    #[error("malformed control message")]
    Message(#[from] serde_json::Error),
}
