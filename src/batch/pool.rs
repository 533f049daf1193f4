//! Grouped concurrent execution of a request batch.

use super::config::PoolConfig;
use super::plan::plan_groups;
use super::results::ResponseList;
use crate::transport::{ReqwestTransport, Transport, TransportError};
use crate::types::{ElapsedTime, Request, Response};
use crate::{Error, ErrorContext, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

/// Lifecycle of a [`RequestPool`]. A pool runs at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    Ready,
    Running,
    Consumed,
}

/// Owns a batch of requests and runs them in bounded concurrent groups.
///
/// Each group is dispatched in full, and the pool waits for every request in
/// it to finish before dispatching the next group. A request that times out or
/// fails at the transport level gets a failed [`Response`]; nothing a single
/// request does can abort the run.
///
/// ```rust,no_run
/// use multireq::{PoolConfig, Request, RequestPool};
/// use std::time::Duration;
///
/// # fn main() -> multireq::Result<()> {
/// let requests = vec![
///     Request::get("https://example.com/"),
///     Request::get("https://example.org/"),
/// ];
/// let config = PoolConfig::new().with_timeout(Duration::from_secs(2));
/// let results = RequestPool::with_config(requests, config).run_blocking()?;
/// for resp in results.successful() {
///     println!("{}", resp);
/// }
/// println!("took {} ms", results.elapsed().millis());
/// # Ok(())
/// # }
/// ```
pub struct RequestPool {
    requests: Vec<Request>,
    config: PoolConfig,
    transport: Option<Arc<dyn Transport>>,
    state: PoolState,
}

impl RequestPool {
    /// Pool with the default limit of 10 concurrent requests and a 5 second timeout.
    pub fn new(requests: Vec<Request>) -> Self {
        Self::with_config(requests, PoolConfig::default())
    }

    pub fn with_config(requests: Vec<Request>, config: PoolConfig) -> Self {
        Self {
            requests,
            config,
            transport: None,
            state: PoolState::Ready,
        }
    }

    /// Use `transport` instead of a `ReqwestTransport` built from the config.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn state(&self) -> PoolState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Run every request and collect the responses.
    ///
    /// Must be called from within a multi-threaded tokio runtime for requests
    /// of a group to execute in parallel. Fails with [`Error::AlreadyConsumed`]
    /// on a second call and with [`Error::Configuration`] on an invalid config;
    /// request-level failures are reported in the returned list instead.
    #[tracing::instrument(
        skip(self),
        fields(requests = self.requests.len(), group_limit = self.config.group_limit)
    )]
    pub async fn run(&mut self) -> Result<ResponseList> {
        match self.state {
            PoolState::Ready => {}
            PoolState::Running | PoolState::Consumed => return Err(Error::AlreadyConsumed),
        }
        self.config.validate()?;

        let transport = match &self.transport {
            Some(t) => Arc::clone(t),
            None => Arc::new(ReqwestTransport::from_config(&self.config)?) as Arc<dyn Transport>,
        };

        self.state = PoolState::Running;
        // Consumed on every exit, including when this future is dropped mid-run.
        let _consumed = ConsumeOnDrop(&mut self.state);
        let mut requests = std::mem::take(&mut self.requests);
        let timeout = self.config.timeout;
        let start = Instant::now();

        let n = requests.len();
        let mut outcomes: Vec<Option<Response>> = (0..n).map(|_| None).collect();
        let groups = plan_groups(n, self.config.group_limit, self.config.grouping);
        let group_total = groups.len();

        for (g, group) in groups.into_iter().enumerate() {
            let mut indices = Vec::with_capacity(group.len());
            let mut handles = Vec::with_capacity(group.len());
            for idx in group {
                let request = &mut requests[idx];
                request.mark_running();
                debug!(
                    group = g,
                    request_id = %request.id(),
                    method = %request.method,
                    url = %request.url,
                    "Dispatching request"
                );
                let snapshot = request.clone();
                let transport = Arc::clone(&transport);
                indices.push(idx);
                handles.push(AbortOnDrop(tokio::spawn(async move {
                    execute(transport, snapshot, timeout).await
                })));
            }
            let dispatched = handles.len();

            // Group barrier.
            let joined = futures::future::join_all(handles).await;

            for (idx, res) in indices.into_iter().zip(joined) {
                let response = res.unwrap_or_else(|e| {
                    warn!(
                        request_id = %requests[idx].id(),
                        error = %e,
                        "Request task did not complete"
                    );
                    Response::failed(format!("request task failed: {}", e))
                });
                requests[idx].mark_done();
                outcomes[idx] = Some(response);
            }

            debug!(group = g, groups = group_total, dispatched, "Group finished");
        }

        let elapsed = ElapsedTime::from_duration(start.elapsed());

        let entries = requests
            .into_iter()
            .zip(outcomes)
            .map(|(req, out)| {
                let resp = out.unwrap_or_else(|| Response::failed("request was never dispatched"));
                (req, resp)
            })
            .collect::<Vec<_>>();

        let list = ResponseList::new(entries, elapsed);
        info!(
            total = list.len(),
            succeeded = list.successful().len(),
            failed = list.failed().len(),
            elapsed_ms = elapsed.millis(),
            "Request pool finished"
        );
        Ok(list)
    }

    /// Blocking variant of [`run`](Self::run) on a dedicated multi-threaded runtime.
    ///
    /// Returns [`Error::Runtime`] when called from inside a tokio runtime.
    pub fn run_blocking(&mut self) -> Result<ResponseList> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::runtime_with_context(
                "run_blocking called from within a tokio runtime; use run().await instead",
                ErrorContext::new().with_source("request_pool"),
            ));
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                Error::runtime_with_context(
                    "failed to start tokio runtime",
                    ErrorContext::new()
                        .with_details(e.to_string())
                        .with_source("request_pool"),
                )
            })?;
        runtime.block_on(self.run())
    }
}

/// Sets the pool state to [`PoolState::Consumed`] when dropped.
struct ConsumeOnDrop<'a>(&'a mut PoolState);

impl Drop for ConsumeOnDrop<'_> {
    fn drop(&mut self) {
        *self.0 = PoolState::Consumed;
    }
}

/// Join handle that aborts its task when dropped before completion.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Future for AbortOnDrop<T> {
    type Output = std::result::Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Execute one request, turning every error into a failed response.
async fn execute(transport: Arc<dyn Transport>, request: Request, timeout: Duration) -> Response {
    let result = match tokio::time::timeout(timeout, transport.execute(&request, timeout)).await {
        Ok(res) => res,
        Err(_) => Err(TransportError::Timeout(timeout)),
    };

    match result {
        Ok(resp) => resp,
        Err(e) => {
            warn!(
                request_id = %request.id(),
                url = %request.url,
                timeout = e.is_timeout(),
                error = %e,
                "Request failed"
            );
            Response::failed(e.to_string())
        }
    }
}
