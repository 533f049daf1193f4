//! # multireq
//!
//! Dispatch a batch of independent HTTP requests concurrently, a bounded
//! group at a time, and query the collected responses afterwards.
//!
//! ## Overview
//!
//! - **Bounded groups**: at most `group_limit` requests run at once
//! - **Per-request timeout**: a shared timeout applies to every request
//! - **Failures are data**: timeouts and transport errors become failed
//!   [`Response`]s (code `-1`) instead of aborting the batch
//! - **Queryable results**: [`ResponseList`] filters by success, status code or URL
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use multireq::{Request, RequestPool};
//!
//! #[tokio::main]
//! async fn main() -> multireq::Result<()> {
//!     let requests = vec![
//!         Request::get("https://example.com/"),
//!         Request::post("https://httpbin.org/post", "hello"),
//!     ];
//!
//!     let mut pool = RequestPool::new(requests);
//!     let results = pool.run().await?;
//!
//!     println!("{} ({})", results, results.elapsed());
//!     if let Some(first) = results.first_by_code(200) {
//!         println!("{}", first.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Pool, configuration, group planning and results |
//! | [`transport`] | HTTP transport seam and the reqwest implementation |
//! | [`types`] | Request, response and elapsed-time types |

pub mod batch;
pub mod transport;
pub mod types;

pub use batch::{GroupingPolicy, PoolConfig, PoolState, RequestPool, ResponseList};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::{ElapsedTime, Request, RequestId, RequestState, Response};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
