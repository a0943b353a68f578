//! API client
//!
//! Composes the transport, the token session, and the tagged cache into the
//! read and mutation paths:
//! - Reads go through the cache; a fresh entry short-circuits the network,
//!   concurrent reads for one key share a single in-flight fetch, and a
//!   failed fetch caches nothing.
//! - A 401 triggers one session refresh and one replay; a second 401
//!   surfaces as an auth error without another refresh.
//! - Mutations carry the caller's record version, are never retried, and
//!   invalidate exactly the affected cache tags on success.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use registra_common::{AuthSession, SessionError, TaggedCache};
use registra_domain::{CacheSettings, ClientError, Config, Page, ProblemDetail};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::refresh::HttpTokenRefresher;
use super::resources::{item_tag, Resource};
use crate::http::Transport;
use crate::search::SearchParams;

type SharedFetch = Shared<BoxFuture<'static, Result<Value, ClientError>>>;

/// Client for the Registra API.
pub struct ApiClient {
    transport: Arc<Transport>,
    session: Arc<AuthSession>,
    cache: TaggedCache<Value>,
    inflight: Arc<Mutex<HashMap<String, SharedFetch>>>,
    cache_settings: CacheSettings,
}

impl ApiClient {
    /// Create a builder for fluent configuration.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// The token session, for sign-in/sign-out and status observation.
    #[must_use]
    pub fn session(&self) -> Arc<AuthSession> {
        Arc::clone(&self.session)
    }

    /// Invalidate every cache entry carrying `tag`. Returns the number
    /// removed. Mutations do this automatically; this is for callers that
    /// learn about remote changes out of band.
    pub fn invalidate(&self, tag: &str) -> usize {
        self.cache.invalidate_tag(tag)
    }

    /// Read a page of records, through the cache.
    ///
    /// # Errors
    /// Any [`ClientError`]; a failed read never populates the cache.
    pub async fn list<R: Resource>(&self, params: &SearchParams) -> Result<Page<R>, ClientError> {
        let key = params.cache_key(R::TYPE);
        let value = self
            .read_value(
                key,
                R::PATH.to_string(),
                params.to_query(),
                self.cache_settings.stale_after(R::TYPE),
                vec![R::TYPE.to_string()],
            )
            .await?;
        from_value(value)
    }

    /// Read a single record by id, through the cache.
    ///
    /// # Errors
    /// Any [`ClientError`], including `NotFound`.
    pub async fn get<R: Resource>(&self, id: i64) -> Result<R, ClientError> {
        let key = format!("{}/{id}", R::TYPE);
        let path = format!("{}/{id}", R::PATH);
        let tags = vec![R::TYPE.to_string(), item_tag(R::TYPE, id)];
        let value = self
            .read_value(key, path, Vec::new(), self.cache_settings.stale_after(R::TYPE), tags)
            .await?;
        from_value(value)
    }

    /// Create a record. On success, listing caches for the type are
    /// invalidated (item caches are untouched: no item could exist yet).
    ///
    /// Mutations are never retried automatically.
    ///
    /// # Errors
    /// Any [`ClientError`]; a failed create invalidates nothing.
    pub async fn create<R: Resource, B: Serialize>(&self, body: &B) -> Result<R, ClientError> {
        let body = to_value(body)?;
        let response = self.send_authorized(Method::POST, R::PATH.to_string(), Some(body)).await?;
        let created: R = decode_json(response).await?;

        self.cache.invalidate_tag(R::TYPE);
        info!(resource = R::TYPE, "record created, listing caches invalidated");
        Ok(created)
    }

    /// Update a record, carrying the caller's last-known `version` in the
    /// body. The server is the sole arbiter of conflicts: a version mismatch
    /// comes back as [`ClientError::Conflict`] and must be resolved by
    /// re-reading; nothing is retried or invalidated on failure.
    ///
    /// # Errors
    /// Any [`ClientError`], including `Conflict` on a stale version.
    pub async fn update<R: Resource, B: Serialize>(
        &self,
        id: i64,
        body: &B,
        version: i64,
    ) -> Result<R, ClientError> {
        let mut body = to_value(body)?;
        let Some(fields) = body.as_object_mut() else {
            return Err(ClientError::Unknown("update payload must be a JSON object".to_string()));
        };
        fields.insert("version".to_string(), version.into());

        let path = format!("{}/{id}", R::PATH);
        let response = self.send_authorized(Method::PUT, path, Some(body)).await?;
        let updated: R = decode_json(response).await?;

        self.cache.invalidate_tag(&item_tag(R::TYPE, id));
        self.cache.invalidate_tag(R::TYPE);
        info!(resource = R::TYPE, id, "record updated, caches invalidated");
        Ok(updated)
    }

    /// Delete a record.
    ///
    /// # Errors
    /// Any [`ClientError`]; a failed delete invalidates nothing.
    pub async fn remove<R: Resource>(&self, id: i64) -> Result<(), ClientError> {
        let path = format!("{}/{id}", R::PATH);
        let response = self.send_authorized(Method::DELETE, path, None).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(decode_problem(status, response).await);
        }

        self.cache.invalidate_tag(&item_tag(R::TYPE, id));
        self.cache.invalidate_tag(R::TYPE);
        info!(resource = R::TYPE, id, "record deleted, caches invalidated");
        Ok(())
    }

    /// Cached, coalesced GET returning the raw JSON value.
    async fn read_value(
        &self,
        key: String,
        path: String,
        query: Vec<(String, String)>,
        stale_after: Duration,
        tags: Vec<String>,
    ) -> Result<Value, ClientError> {
        if let Some(value) = self.cache.get_fresh(&key) {
            debug!(key = %key, "cache hit");
            return Ok(value);
        }

        let shared = {
            let mut inflight = self.inflight.lock().await;
            if let Some(existing) = inflight.get(&key).cloned() {
                debug!(key = %key, "joining in-flight read");
                existing
            } else {
                let transport = Arc::clone(&self.transport);
                let session = Arc::clone(&self.session);
                let cache = self.cache.clone();
                let inflight_map = Arc::clone(&self.inflight);
                let task_key = key.clone();

                // Detached task: a fetch abandoned by all subscribers still
                // runs to completion and populates the cache.
                let handle = tokio::spawn(async move {
                    let result = fetch_value(&transport, &session, &path, &query).await;
                    if let Ok(value) = &result {
                        cache.insert(task_key.clone(), value.clone(), stale_after, tags);
                    }
                    inflight_map.lock().await.remove(&task_key);
                    result
                });
                let shared: SharedFetch = async move {
                    match handle.await {
                        Ok(result) => result,
                        Err(err) => Err(ClientError::Unknown(format!("read task failed: {err}"))),
                    }
                }
                .boxed()
                .shared();

                inflight.insert(key, shared.clone());
                shared
            }
        };

        shared.await
    }

    async fn send_authorized(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<Response, ClientError> {
        send_with_auth(&self.transport, &self.session, method, &path, &[], body.as_ref()).await
    }
}

/// GET + decode used by the read path's fetch task.
async fn fetch_value(
    transport: &Transport,
    session: &AuthSession,
    path: &str,
    query: &[(String, String)],
) -> Result<Value, ClientError> {
    let response = send_with_auth(transport, session, Method::GET, path, query, None).await?;
    decode_json(response).await
}

/// Send a request with the current access token, refreshing and replaying
/// exactly once on a 401. A 401 on the replay is an auth error; no second
/// refresh is attempted.
async fn send_with_auth(
    transport: &Transport,
    session: &AuthSession,
    method: Method,
    path: &str,
    query: &[(String, String)],
    body: Option<&Value>,
) -> Result<Response, ClientError> {
    let (token, generation) = session.access_token().await.map_err(auth_error)?;

    let response =
        transport.send(build_request(transport, &method, path, query, body, &token)).await?;
    if response.status() != StatusCode::UNAUTHORIZED {
        return Ok(response);
    }

    debug!(%method, path, "access token rejected, requesting refresh");
    let token = session.refresh_after_unauthorized(generation).await.map_err(auth_error)?;

    let response =
        transport.send(build_request(transport, &method, path, query, body, &token)).await?;
    if response.status() == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Auth("request rejected again after token refresh".to_string()));
    }
    Ok(response)
}

fn build_request(
    transport: &Transport,
    method: &Method,
    path: &str,
    query: &[(String, String)],
    body: Option<&Value>,
    token: &str,
) -> RequestBuilder {
    let mut builder = transport.request(method.clone(), path).bearer_auth(token);
    if !query.is_empty() {
        builder = builder.query(query);
    }
    if let Some(body) = body {
        builder = builder.json(body);
    }
    builder
}

fn auth_error(err: SessionError) -> ClientError {
    ClientError::Auth(err.to_string())
}

fn to_value<B: Serialize>(body: &B) -> Result<Value, ClientError> {
    serde_json::to_value(body)
        .map_err(|err| ClientError::Unknown(format!("failed to serialize request body: {err}")))
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value)
        .map_err(|err| ClientError::Unknown(format!("unexpected response shape: {err}")))
}

/// Decode a success body, or classify the failure.
async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(decode_problem(status, response).await);
    }
    if status == StatusCode::NO_CONTENT {
        return serde_json::from_value(Value::Null).map_err(|_| {
            ClientError::Unknown("no-content response for a body-bearing call".to_string())
        });
    }
    response
        .json()
        .await
        .map_err(|err| ClientError::Unknown(format!("failed to parse response body: {err}")))
}

/// Read the problem document (if any) and classify by status.
async fn decode_problem(status: StatusCode, response: Response) -> ClientError {
    let problem: Option<ProblemDetail> = response.json().await.ok();
    ClientError::from_status(status.as_u16(), problem)
}

/// Builder for [`ApiClient`].
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<Config>,
    transport: Option<Arc<Transport>>,
    session: Option<Arc<AuthSession>>,
}

impl ApiClientBuilder {
    /// Set the client configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a pre-built transport (the config's API section is then ignored
    /// for transport construction).
    pub fn transport(mut self, transport: Arc<Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use an existing session. When omitted, a session backed by the API's
    /// own refresh endpoint is created over the transport.
    pub fn session(mut self, session: Arc<AuthSession>) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the API client.
    ///
    /// # Errors
    /// `ClientError::Config` when the transport cannot be constructed.
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let config = self.config.unwrap_or_default();

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                Transport::builder()
                    .base_url(config.api.base_url.as_str())
                    .timeout(Duration::from_secs(config.api.timeout_seconds))
                    .actor(config.api.actor.as_str())
                    .build()?,
            ),
        };

        let session = self.session.unwrap_or_else(|| {
            Arc::new(AuthSession::new(Arc::new(HttpTokenRefresher::new(Arc::clone(&transport)))))
        });

        Ok(ApiClient {
            transport,
            session,
            cache: TaggedCache::new(),
            inflight: Arc::new(Mutex::new(HashMap::new())),
            cache_settings: config.cache,
        })
    }
}
