//! Incoming responses.

use bytes::Bytes;
use url::Url;

use crate::request::Headers;

/// Classification of a response, mirroring the fetch `Response.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    /// An ordinary same-origin response.
    #[default]
    Basic,
    /// A cross-origin response with readable headers.
    Cors,
    /// A network error materialized as a response object.
    Error,
}

/// A full response. Cloning is cheap: the body is reference-counted, so a
/// response can be stored in a cache and returned to the caller at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code (0 for [`ResponseKind::Error`]).
    pub status: u16,
    /// Response classification.
    pub kind: ResponseKind,
    /// Final URL after redirects, when known.
    pub url: Option<Url>,
    /// Response headers.
    pub headers: Headers,
    /// Response body.
    pub body: Bytes,
}

impl Response {
    /// Creates a basic response with the given status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            kind: ResponseKind::Basic,
            url: None,
            headers: Headers::new(),
            body: body.into(),
        }
    }

    /// A `200 OK` response.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, body)
    }

    /// A `200 OK` response tagged as `text/html`.
    pub fn html(body: impl Into<Bytes>) -> Self {
        Self::ok(body).with_header("content-type", "text/html; charset=utf-8")
    }

    /// A network-error response object.
    pub fn error() -> Self {
        Self {
            kind: ResponseKind::Error,
            ..Self::new(0, Bytes::new())
        }
    }

    /// Adds a header, builder style.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// True for any 2xx status.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the response may be stored in an offline cache: exactly
    /// `200` and not an error object.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind != ResponseKind::Error
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_plain_200_is_cacheable() {
        assert!(Response::ok("x").is_cacheable());
        assert!(!Response::new(204, "").is_cacheable());
        assert!(!Response::new(404, "").is_cacheable());
        assert!(!Response::error().is_cacheable());
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(Response::new(204, "").is_ok());
        assert!(!Response::new(301, "").is_ok());
        assert!(!Response::error().is_ok());
    }
}
