//! Refresh dependency trait

use async_trait::async_trait;

use super::session::SessionError;
use super::types::TokenPair;

/// Exchanges a refresh token for a new token pair.
///
/// Implemented over the HTTP transport in the client crate; tests inject
/// mocks to drive the session deterministically.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<TokenPair, SessionError>;
}
