//! Test-only scripted [`Network`] for the site runtime.
//!
//! [`ScriptedNetwork`] answers requests from a per-URL script instead of a
//! live origin. Each route holds a queue of replies; the last reply of a
//! queue repeats forever, so `page("/a.html", ...)` serves the same page to
//! every request while `sequence(...)` models a page that changes between
//! fetches. Unknown URLs answer `404`. Every request is logged.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use danis_net::{Network, NetworkError, Request, Response};
use parking_lot::Mutex;
use url::Url;

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer with this response.
    Respond(Response),
    /// Fail as if the origin were unreachable.
    Fail,
}

#[derive(Debug, Default)]
struct Script {
    routes: HashMap<String, VecDeque<Reply>>,
    log: Vec<Request>,
    offline: bool,
    latency: Duration,
}

/// A [`Network`] that replays scripted replies.
#[derive(Debug)]
pub struct ScriptedNetwork {
    origin: Url,
    script: Mutex<Script>,
}

impl ScriptedNetwork {
    /// Creates an empty script rooted at `origin` (e.g. `https://example.com`).
    ///
    /// # Panics
    ///
    /// Panics if `origin` is not an absolute URL; this crate is test-only.
    #[allow(clippy::expect_used)]
    pub fn new(origin: &str) -> Self {
        Self {
            origin: Url::parse(origin).expect("scripted origin must be an absolute url"),
            script: Mutex::new(Script::default()),
        }
    }

    /// Resolves a root-relative path against the origin.
    ///
    /// # Panics
    ///
    /// Panics if `path` cannot be joined onto the origin.
    #[allow(clippy::expect_used)]
    pub fn url(&self, path: &str) -> Url {
        self.origin.join(path).expect("scripted path must join onto origin")
    }

    fn key(url: &Url) -> String {
        let mut url = url.clone();
        url.set_fragment(None);
        url.to_string()
    }

    fn route(&self, path: &str, replies: Vec<Reply>) -> &Self {
        let key = Self::key(&self.url(path));
        self.script.lock().routes.insert(key, replies.into());
        self
    }

    /// Serves `html` with status 200 for every request to `path`.
    pub fn page(&self, path: &str, html: &str) -> &Self {
        self.respond(path, Response::html(html.to_string()))
    }

    /// Serves `response` for every request to `path`.
    pub fn respond(&self, path: &str, response: Response) -> &Self {
        self.route(path, vec![Reply::Respond(response)])
    }

    /// Serves the replies in order; the last one repeats.
    pub fn sequence(&self, path: &str, replies: Vec<Reply>) -> &Self {
        self.route(path, replies)
    }

    /// Fails every request to `path`.
    pub fn fail(&self, path: &str) -> &Self {
        self.route(path, vec![Reply::Fail])
    }

    /// Fails every request, whatever the route says.
    pub fn set_offline(&self, offline: bool) {
        self.script.lock().offline = offline;
    }

    /// Delays every reply by `latency` (uses tokio time, so paused-clock
    /// tests advance it deterministically).
    pub fn set_latency(&self, latency: Duration) {
        self.script.lock().latency = latency;
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Request> {
        self.script.lock().log.clone()
    }

    /// Number of requests received for `path`.
    pub fn request_count(&self, path: &str) -> usize {
        let key = Self::key(&self.url(path));
        self.script
            .lock()
            .log
            .iter()
            .filter(|r| Self::key(&r.url) == key)
            .count()
    }

    fn next_reply(&self, request: &Request) -> (Option<Reply>, bool, Duration) {
        let mut script = self.script.lock();
        script.log.push(request.clone());
        let offline = script.offline;
        let latency = script.latency;
        let reply = script
            .routes
            .get_mut(&Self::key(&request.url))
            .and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            });
        (reply, offline, latency)
    }
}

#[async_trait]
impl Network for ScriptedNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        let (reply, offline, latency) = self.next_reply(request);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if offline {
            return Err(NetworkError::unreachable(request.url.as_str(), "offline"));
        }
        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail) => Err(NetworkError::unreachable(
                request.url.as_str(),
                "scripted failure",
            )),
            None => Ok(Response::new(404, "not found")),
        }
    }
}

/// Builds a small page with a `<main>` landmark and the metadata tags the
/// swapper copies.
pub fn landmark_page(title: &str, main: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><title>{title}</title>\
         <meta name=\"description\" content=\"{title} description\">\
         <meta property=\"og:title\" content=\"{title}\">\
         <meta property=\"og:description\" content=\"{title} og description\">\
         <meta property=\"og:url\" content=\"https://example.com/{slug}\">\
         <meta property=\"og:image\" content=\"https://example.com/{slug}.jpg\">\
         </head><body><nav><a href=\"/\">Home</a></nav><main>{main}</main>\
         <footer>Danis Photography</footer></body></html>",
        slug = title.to_ascii_lowercase().replace(' ', "-"),
    )
}
