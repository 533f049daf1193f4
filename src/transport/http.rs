use super::{Transport, TransportError};
use crate::batch::PoolConfig;
use crate::types::{Request, Response};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::{Method, Proxy};
use std::collections::HashMap;
use std::time::Duration;

/// Default transport backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::from_config(&PoolConfig::default())
    }

    pub fn from_config(config: &PoolConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            // One idle connection per concurrently running request is enough.
            .pool_max_idle_per_host(config.group_limit.max(1));

        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    "invalid proxy URL",
                    ErrorContext::new()
                        .with_field_path("pool.proxy_url")
                        .with_details(e.to_string())
                        .with_source("reqwest_transport"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn parse_method(method: &str) -> std::result::Result<Method, TransportError> {
        Method::from_bytes(method.to_uppercase().as_bytes())
            .map_err(|_| TransportError::InvalidMethod(method.to_string()))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(
        skip(self, request),
        fields(request_id = %request.id(), method = %request.method, url = %request.url)
    )]
    async fn execute(
        &self,
        request: &Request,
        timeout: Duration,
    ) -> std::result::Result<Response, TransportError> {
        let method = Self::parse_method(&request.method)?;
        let url = url::Url::parse(&request.url)?;

        let mut req = self.client.request(method, url).timeout(timeout);

        if let Some(headers) = &request.headers {
            for (k, v) in headers {
                req = req.header(k, v);
            }
        }

        if let Some(body) = &request.body {
            req = req.body(body.clone());
            tracing::trace!(body_len = body.len(), "Added request body");
        }

        let response = req.send().await.map_err(|e| classify(e, timeout))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let cookies: HashMap<String, String> = response
            .cookies()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();

        let content = response.bytes().await.map_err(|e| classify(e, timeout))?;

        tracing::debug!(status, response_len = content.len(), "HTTP request completed");

        Ok(Response::success(status, content, headers, cookies))
    }
}

fn classify(e: reqwest::Error, timeout: Duration) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_normalizes_case() {
        assert_eq!(ReqwestTransport::parse_method("get").unwrap(), Method::GET);
        assert_eq!(ReqwestTransport::parse_method("Post").unwrap(), Method::POST);
    }

    #[test]
    fn test_parse_method_rejects_invalid_token() {
        let err = ReqwestTransport::parse_method("NOT A METHOD").unwrap_err();
        assert!(matches!(err, TransportError::InvalidMethod(ref m) if m == "NOT A METHOD"));
        assert!(ReqwestTransport::parse_method("").is_err());
    }

    #[test]
    fn test_invalid_proxy_is_configuration_error() {
        let config = PoolConfig::new().with_proxy_url("http://[::1");
        let err = ReqwestTransport::from_config(&config).err().unwrap();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_invalid_url_fails_before_sending() {
        let transport = ReqwestTransport::new().unwrap();
        let req = Request::get("not a url");
        let err = tokio_test::block_on(transport.execute(&req, Duration::from_secs(1)))
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
        assert!(!err.is_timeout());
    }
}
