//! Normalized outcome of one request.

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Status code reported by a failed response.
pub const FAILED_CODE: i32 = -1;

/// Result of executing a [`Request`](crate::Request).
///
/// A response is either successful (the server answered, whatever the status)
/// or failed (timeout, connection error, invalid method or URL). Failed
/// responses carry sentinel values so callers can read every field without
/// matching on the failure cause.
#[derive(Debug, Clone)]
pub struct Response {
    pub successful: bool,
    pub code: i32,
    pub reason: String,
    pub content: Bytes,
    pub text: String,
    pub headers: Option<HeaderMap>,
    pub cookies: Option<HashMap<String, String>>,
    /// Why the request failed. Diagnostic only; `None` on success.
    pub error: Option<String>,
}

impl Response {
    pub fn success(
        code: u16,
        content: Bytes,
        headers: HeaderMap,
        cookies: HashMap<String, String>,
    ) -> Self {
        let reason = reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        let text = decode_text(&content, &headers);
        Self {
            successful: true,
            code: i32::from(code),
            reason,
            content,
            text,
            headers: Some(headers),
            cookies: Some(cookies),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            successful: false,
            code: FAILED_CODE,
            reason: String::new(),
            content: Bytes::new(),
            text: String::new(),
            headers: None,
            cookies: None,
            error: Some(error.into()),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get(name))
            .and_then(|v| v.to_str().ok())
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .as_ref()
            .and_then(|c| c.get(name))
            .map(String::as_str)
    }

    pub fn summary(&self) -> ResponseSummary {
        let headers = self.headers.as_ref().map(|h| {
            h.iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        String::from_utf8_lossy(v.as_bytes()).into_owned(),
                    )
                })
                .collect()
        });
        ResponseSummary {
            successful: self.successful,
            code: self.code,
            reason: self.reason.clone(),
            content_length: self.content.len(),
            headers,
            error: self.error.clone(),
        }
    }
}

/// Charset label from a `Content-Type` value, e.g. `text/html; charset="utf-8"`.
fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

/// Decode a body with the charset declared in `Content-Type`, falling back
/// to UTF-8. Malformed sequences are replaced; a BOM overrides the label.
fn decode_text(content: &[u8], headers: &HeaderMap) -> String {
    let encoding = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(content);
    text.into_owned()
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.successful {
            write!(f, "<Response(Successful, code={})>", self.code)
        } else {
            write!(f, "<Response(Failed)>")
        }
    }
}

/// Serializable view of a [`Response`] for reports.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseSummary {
    pub successful: bool,
    pub code: i32,
    pub reason: String,
    pub content_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
