//! Token pair and session status types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh token pair with an estimated expiry.
///
/// Exactly one live instance exists per process, owned by
/// [`super::AuthSession`]; every other component holds short-lived copies of
/// the access token string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Estimated absolute expiry, calculated from the server-reported
    /// lifetime at creation time. `None` when the server reports none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenPair {
    /// Create a pair, computing `expires_at` from a lifetime in seconds.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        let expires_at =
            (expires_in > 0).then(|| Utc::now() + chrono::Duration::seconds(expires_in));
        Self { access_token, refresh_token, expires_at }
    }

    /// Whether the access token is expired or will expire within the given
    /// threshold. A pair without expiry metadata is assumed valid.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + chrono::Duration::seconds(threshold_seconds) >= expires_at,
            None => false,
        }
    }
}

/// Token response from the refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
}

impl From<TokenResponse> for TokenPair {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.refresh_token, response.expires_in)
    }
}

/// Session lifecycle as observed by collaborators (e.g. the component
/// responsible for session UI).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token pair held.
    SignedOut,
    /// A token pair is held and usable.
    Active,
    /// A refresh is in flight.
    Refreshing,
    /// Refresh failed; the pair was discarded and the user must
    /// re-authenticate.
    ReauthRequired,
}
