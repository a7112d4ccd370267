//! reqwest-backed [`Network`] for talking to a live origin.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::NetworkError;
use crate::network::Network;
use crate::request::{Headers, Method, Request};
use crate::response::{Response, ResponseKind};

/// HTTP(S) transport over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
}

impl HttpNetwork {
    /// Creates a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("danis-site/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::unreachable("<client>", e.to_string()))?;
        Ok(Self { client })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

fn classify(url: &str, err: &reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_builder() {
        NetworkError::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        }
    } else {
        NetworkError::unreachable(url, err.to_string())
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        let url = request.url.as_str();
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.clone());
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        tracing::trace!(method = %request.method, url, "http.fetch");
        let reply = builder.send().await.map_err(|e| classify(url, &e))?;

        let status = reply.status().as_u16();
        let final_url = reply.url().clone();
        let mut headers = Headers::new();
        for (name, value) in reply.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str(), value);
            }
        }
        let body = reply.bytes().await.map_err(|e| NetworkError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let kind = if final_url.origin() == request.url.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };

        Ok(Response {
            status,
            kind,
            url: Some(final_url),
            headers,
            body,
        })
    }
}
