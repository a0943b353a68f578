//! Token refresh over the HTTP transport
//!
//! The refresh endpoint is a first-party JSON call: it takes the refresh
//! token in the body and deliberately carries no bearer header (the access
//! token being refreshed is the one that just failed).

use std::sync::Arc;

use async_trait::async_trait;
use registra_common::{SessionError, TokenPair, TokenRefresher, TokenResponse};
use reqwest::Method;
use tracing::debug;

use crate::http::Transport;

const REFRESH_PATH: &str = "/auth/refresh";

/// [`TokenRefresher`] implementation backed by the API's refresh endpoint.
pub struct HttpTokenRefresher {
    transport: Arc<Transport>,
}

impl HttpTokenRefresher {
    #[must_use]
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenPair, SessionError> {
        debug!("exchanging refresh token");
        let body = serde_json::json!({ "refreshToken": refresh_token });
        let request = self.transport.request(Method::POST, REFRESH_PATH).json(&body);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|err| SessionError::RefreshFailed(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::RefreshRejected(format!(
                "refresh endpoint returned status {status}"
            )));
        }

        let tokens: TokenResponse = response.json().await.map_err(|err| {
            SessionError::RefreshFailed(format!("failed to parse refresh response: {err}"))
        })?;
        Ok(tokens.into())
    }
}
