//! Pool configuration.

use crate::{Error, ErrorContext, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// How requests are partitioned into concurrently dispatched groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingPolicy {
    /// `ceil(n / limit)` consecutive groups of at most `limit` requests.
    #[default]
    Chunked,
    /// Compatibility mode: `floor(n / limit) + n % limit` groups, each one
    /// rescanning the whole list for pending requests. The first group ends
    /// up dispatching every request.
    Legacy,
}

impl FromStr for GroupingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chunked" => Ok(GroupingPolicy::Chunked),
            "legacy" => Ok(GroupingPolicy::Legacy),
            other => Err(Error::configuration_with_context(
                "unknown grouping policy",
                ErrorContext::new()
                    .with_field_path("pool.grouping")
                    .with_details(format!("expected 'chunked' or 'legacy', got '{}'", other)),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of requests running at once.
    pub group_limit: usize,
    /// Timeout applied to every request.
    pub timeout: Duration,
    pub grouping: GroupingPolicy,
    pub user_agent: Option<String>,
    pub proxy_url: Option<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            group_limit: 10,
            timeout: Duration::from_secs(5),
            grouping: GroupingPolicy::default(),
            user_agent: None,
            proxy_url: None,
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `MULTIREQ_GROUP_LIMIT`, `MULTIREQ_TIMEOUT_SECS`,
    /// `MULTIREQ_GROUPING` and `MULTIREQ_PROXY_URL`.
    ///
    /// Unparseable or out-of-range numeric values are ignored; an unknown
    /// grouping name is an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(limit) = env::var("MULTIREQ_GROUP_LIMIT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            config.group_limit = limit;
        }

        if let Some(timeout) = env::var("MULTIREQ_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        {
            config.timeout = timeout;
        }

        if let Ok(grouping) = env::var("MULTIREQ_GROUPING") {
            config.grouping = grouping.parse()?;
        }

        if let Ok(proxy) = env::var("MULTIREQ_PROXY_URL") {
            if !proxy.is_empty() {
                config.proxy_url = Some(proxy);
            }
        }

        Ok(config)
    }

    pub fn with_group_limit(mut self, limit: usize) -> Self {
        self.group_limit = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_grouping(mut self, grouping: GroupingPolicy) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.group_limit == 0 {
            return Err(Error::configuration_with_context(
                "group limit must be at least 1",
                ErrorContext::new()
                    .with_field_path("pool.group_limit")
                    .with_details("got 0")
                    .with_source("pool_config"),
            ));
        }
        if self.timeout.is_zero() {
            return Err(Error::configuration_with_context(
                "timeout must be greater than zero",
                ErrorContext::new()
                    .with_field_path("pool.timeout")
                    .with_source("pool_config"),
            ));
        }
        Ok(())
    }
}
