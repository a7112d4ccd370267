//! The async network seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NetworkError;
use crate::request::Request;
use crate::response::Response;

/// Anything that can turn a [`Request`] into a [`Response`].
///
/// Implementations must resolve non-success statuses to `Ok`; only a
/// request that produced no response at all is an `Err`.
#[async_trait]
pub trait Network: Send + Sync {
    /// Performs the request.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] when no response could be obtained.
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError>;
}

#[async_trait]
impl<N: Network + ?Sized> Network for Arc<N> {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        (**self).fetch(request).await
    }
}
