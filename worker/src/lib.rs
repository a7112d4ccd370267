//! Offline worker for the site.
//!
//! The worker owns one version-qualified cache. On install it precaches a
//! fixed manifest, all or nothing; on activation it deletes every cache of
//! an older version and claims the open pages. Once active it answers GET
//! requests stale-while-revalidate: a cached response is returned at once
//! while a background task refreshes the entry, a miss goes to the network
//! and is stored, and an HTML request that cannot reach the network gets the
//! offline document.
//!
//! [`ServiceWorker`] also implements [`danis_net::Network`], so a page's
//! fetches (including the soft-navigation engine's) can be routed through
//! it.
//!
//! # Entry Point
//!
//! ```no_run
//! use danis_net::{HttpNetwork, Request};
//! use danis_worker::{ServiceWorker, WorkerConfig};
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let scope = Url::parse("https://danisphotography.com/")?;
//! let network = HttpNetwork::new(std::time::Duration::from_secs(10))?;
//! let worker = ServiceWorker::new(scope.clone(), WorkerConfig::default(), network);
//!
//! if let Some(report) = worker.start().await? {
//!     println!("evicted {:?}", report.evicted);
//! }
//! let page = Request::get(scope.join("/gallery.html")?).with_header("accept", "text/html");
//! let answer = worker.handle_fetch(&page).await?;
//! println!("{:?}", answer.source());
//! worker.settle().await;
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod error;
pub mod interceptor;
pub mod lifecycle;
pub mod storage;
pub mod worker;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use interceptor::{revalidate, Interception, PassThrough, ResponseSource};
pub use lifecycle::{ActivationReport, ClientId, ClientRegistry, ControlMessage, WorkerState};
pub use storage::{Cache, CacheStorage};
pub use worker::ServiceWorker;
