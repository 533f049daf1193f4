//! HTTP transport seam.
//!
//! The pool only talks to [`Transport`]; [`ReqwestTransport`] is the default
//! implementation. Tests and benches inject their own.

mod http;

pub use http::ReqwestTransport;

use crate::types::{Request, Response};
use async_trait::async_trait;
use std::time::Duration;

/// Executes one request and produces a successful [`Response`].
///
/// Any error returned here is folded into a failed response by the pool; it
/// never aborts a run.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: &Request,
        timeout: Duration,
    ) -> std::result::Result<Response, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Timeout(_) => true,
            TransportError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
