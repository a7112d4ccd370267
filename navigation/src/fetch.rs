//! Page fetcher.

use danis_net::{Network, Request};
use url::Url;

use crate::document::DestinationDocument;
use crate::error::FetchError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

/// Fetches destination pages and parses them into [`DestinationDocument`]s.
#[derive(Debug)]
pub struct PageFetcher<N> {
    network: N,
    landmark: String,
}

impl<N: Network> PageFetcher<N> {
    /// A fetcher extracting the `landmark` element from each page.
    pub fn new(network: N, landmark: impl Into<String>) -> Self {
        Self {
            network,
            landmark: landmark.into(),
        }
    }

    /// The underlying network.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// GETs `url` and parses the body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for any non-2xx status and
    /// [`FetchError::Network`] when no response arrives.
    pub async fn fetch(&self, url: &Url) -> Result<DestinationDocument, FetchError> {
        let request = Request::get(url.clone()).with_header("accept", ACCEPT_HTML);
        let response = self.network.fetch(&request).await?;
        if !response.is_ok() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }
        tracing::debug!(url = %url, bytes = response.body.len(), "destination fetched");
        Ok(DestinationDocument::parse(&response.text(), &self.landmark))
    }
}
