//! Jolokia HTTP client.
//!
//! # Responsibilities
//! - Issue the management API reads one after another
//! - Decode JSON bodies into broker types
//! - Report transport, decode and shape failures as `FetchError`

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::broker::types::{
    parse_oldest_timestamp, parse_queue_list, parse_started, parse_status, FetchError,
    FetchResult, QueueSnapshot, RoutingType,
};
use crate::broker::urls::JolokiaUrls;
use crate::config::ConnectionConfig;

/// Read access to the broker state the checks need.
#[async_trait]
pub trait BrokerApi: Send + Sync {
    /// All queues with their current message counts.
    async fn list_queues(&self) -> FetchResult<Vec<QueueSnapshot>>;

    /// Timestamp of the oldest message in `queue`, `None` when it is empty.
    async fn oldest_message_timestamp(&self, queue: &str) -> FetchResult<Option<DateTime<Utc>>>;

    /// The broker `Started` flag.
    async fn is_started(&self) -> FetchResult<bool>;

    /// Status reported for a queue or topic MBean read (200 = found).
    async fn lookup_status(&self, name: &str, routing: RoutingType) -> FetchResult<u16>;
}

/// `BrokerApi` backed by a Jolokia HTTP endpoint.
#[derive(Clone)]
pub struct JolokiaClient {
    http: reqwest::Client,
    urls: JolokiaUrls,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

impl JolokiaClient {
    /// Create a client for the given connection settings.
    pub fn new(config: &ConnectionConfig) -> FetchResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .user_agent(concat!("check_artemis/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // An explicit Jolokia URL carries its own credentials, if any.
        let credentials = match config.jolokia_url {
            Some(_) => None,
            None => Some((config.user.clone(), config.password.clone())),
        };

        Ok(Self {
            http,
            urls: JolokiaUrls::from_config(config),
            credentials,
            timeout,
        })
    }

    pub fn urls(&self) -> &JolokiaUrls {
        &self.urls
    }

    async fn send(&self, raw_url: &str) -> FetchResult<reqwest::Response> {
        let url = url::Url::parse(raw_url)
            .map_err(|e| FetchError::Unexpected(format!("invalid URL '{}': {}", raw_url, e)))?;

        let mut request = self.http.get(url);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        tracing::debug!(url = %raw_url, "Jolokia request");
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Network(format!(
                    "request timed out after {} seconds",
                    self.timeout.as_secs()
                ))
            } else {
                FetchError::from(e)
            }
        })
    }

    async fn decode(response: reqwest::Response) -> FetchResult<Value> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// GET a URL and decode its JSON body; non-200 answers are failures.
    async fn fetch_json(&self, raw_url: &str) -> FetchResult<Value> {
        let response = self.send(raw_url).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Jolokia answered with non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }
        Self::decode(response).await
    }
}

#[async_trait]
impl BrokerApi for JolokiaClient {
    async fn list_queues(&self) -> FetchResult<Vec<QueueSnapshot>> {
        let body = self.fetch_json(&self.urls.list_queues()).await?;
        let queues = parse_queue_list(&body)?;
        tracing::debug!(count = queues.len(), "Listed queues");
        Ok(queues)
    }

    async fn oldest_message_timestamp(&self, queue: &str) -> FetchResult<Option<DateTime<Utc>>> {
        let body = self.fetch_json(&self.urls.browse_oldest(queue)).await?;
        parse_oldest_timestamp(&body)
    }

    async fn is_started(&self) -> FetchResult<bool> {
        let body = self.fetch_json(&self.urls.started()).await?;
        parse_started(&body)
    }

    async fn lookup_status(&self, name: &str, routing: RoutingType) -> FetchResult<u16> {
        let response = self.send(&self.urls.address(name, routing)).await?;
        let http_status = response.status();
        if !http_status.is_success() {
            // The MBean endpoint itself is missing; nothing to find there.
            return Ok(http_status.as_u16());
        }
        let body = Self::decode(response).await?;
        parse_status(&body)
    }
}

impl std::fmt::Debug for JolokiaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JolokiaClient")
            .field("base", &self.urls.base())
            .field("timeout_secs", &self.timeout.as_secs())
            .finish()
    }
}
