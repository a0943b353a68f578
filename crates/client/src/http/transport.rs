//! HTTP transport: the single chokepoint for outbound calls
//!
//! Attaches the per-request correlation identifier and the actor-identity
//! header, enforces the configured timeout, and normalizes every failure into
//! a typed error before it reaches callers. One attempt per call; replay and
//! refresh policy live above this layer.

use std::time::Duration;

use registra_domain::{ClientError, DEFAULT_TIMEOUT_SECONDS};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Correlation identifier header, one fresh UUID per request.
pub const CORRELATION_HEADER: &str = "X-Correlation-Id";

/// Actor-identity header.
pub const ACTOR_HEADER: &str = "X-Actor";

/// Bounds for the configurable request timeout.
const MIN_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport with identity headers and timeout enforcement.
#[derive(Debug, Clone)]
pub struct Transport {
    client: ReqwestClient,
    base_url: String,
    actor: String,
    timeout: Duration,
}

impl Transport {
    /// Start building a new transport.
    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    /// Base URL this transport targets (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder for an API path (must start with `/`).
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Execute a request: single attempt, classified failure.
    ///
    /// Any received HTTP response is returned `Ok` regardless of status;
    /// status classification is the caller's concern.
    ///
    /// # Errors
    /// `ClientError::Network` on timeout or connection failure,
    /// `ClientError::Unknown` for anything else the HTTP stack reports.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let correlation_id = Uuid::new_v4();
        let request = builder
            .header(CORRELATION_HEADER, correlation_id.to_string())
            .header(ACTOR_HEADER, &self.actor)
            .build()
            .map_err(|err| ClientError::Unknown(format!("failed to build request: {err}")))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, %correlation_id, "sending HTTP request");

        match tokio::time::timeout(self.timeout, self.client.execute(request)).await {
            Ok(Ok(response)) => {
                let status = response.status();
                debug!(%method, %url, %status, %correlation_id, "received HTTP response");
                Ok(response)
            }
            Ok(Err(err)) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(classify_transport_error(&err))
            }
            Err(_) => Err(ClientError::Network(format!(
                "request timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

/// Builder for [`Transport`].
#[derive(Debug)]
pub struct TransportBuilder {
    base_url: Option<String>,
    timeout: Duration,
    actor: String,
    user_agent: Option<String>,
}

impl Default for TransportBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            actor: "registra-client".to_string(),
            user_agent: None,
        }
    }
}

impl TransportBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Configure the request timeout. Values are clamped to the supported
    /// 10–30s range.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.clamp(MIN_TIMEOUT, MAX_TIMEOUT);
        self
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    /// `ClientError::Config` when the base URL is missing or invalid, or the
    /// HTTP client cannot be constructed.
    pub fn build(self) -> Result<Transport, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Config("API base URL not set".to_string()))?;
        Url::parse(&base_url)
            .map_err(|err| ClientError::Config(format!("invalid API base URL: {err}")))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Transport { client, base_url, actor: self.actor, timeout: self.timeout })
    }
}

fn classify_transport_error(err: &reqwest::Error) -> ClientError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ClientError::Network(format!("HTTP request failed: {err}"))
    } else {
        ClientError::Unknown(format!("HTTP request failed: {err}"))
    }
}
