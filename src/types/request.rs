//! A single HTTP call description plus its execution state.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Identity of a [`Request`]. Clones of a request share the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestId(Uuid);

impl RequestId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Execution state of a request within one pool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Pending,
    Running,
    Done,
}

/// One HTTP call: method, URL, optional headers and body.
///
/// The method is kept as given; an unknown method is only rejected when the
/// request is dispatched, and then shows up as a failed response.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    id: RequestId,
    pub method: String,
    pub url: String,
    pub headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing)]
    pub body: Option<Bytes>,
    state: RequestState,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            method: method.into(),
            url: url.into(),
            headers: None,
            body: None,
            state: RequestState::Pending,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::new("POST", url).with_body(body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }

    pub fn is_done(&self) -> bool {
        self.state == RequestState::Done
    }

    pub(crate) fn mark_running(&mut self) {
        debug_assert_eq!(
            self.state,
            RequestState::Pending,
            "request {} dispatched twice",
            self.id
        );
        self.state = RequestState::Running;
    }

    pub(crate) fn mark_done(&mut self) {
        debug_assert_eq!(
            self.state,
            RequestState::Running,
            "request {} finished without running",
            self.id
        );
        self.state = RequestState::Done;
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Request({}, {})>", self.method, self.url)
    }
}
