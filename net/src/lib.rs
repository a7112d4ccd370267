//! Request/response primitives shared by the site runtime.
//!
//! Both halves of the runtime talk to the network through the [`Network`]
//! trait: the soft-navigation engine fetches destination pages with it, and
//! the offline worker both consumes a `Network` (to reach the origin) and
//! implements one (so page fetches can be routed through its cache).
//!
//! # Entry Point
//!
//! ```no_run
//! use danis_net::{HttpNetwork, Network, Request};
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let network = HttpNetwork::new(std::time::Duration::from_secs(10))?;
//! let request = Request::get(Url::parse("https://danisphotography.com/gallery.html")?)
//!     .with_header("accept", "text/html");
//! let response = network.fetch(&request).await?;
//! assert!(response.is_ok());
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

pub mod error;
pub mod http;
pub mod network;
pub mod request;
pub mod response;

pub use error::NetworkError;
pub use http::HttpNetwork;
pub use network::Network;
pub use request::{Headers, Method, Request};
pub use response::{Response, ResponseKind};
