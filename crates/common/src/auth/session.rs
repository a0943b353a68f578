//! Token session with single-flight refresh
//!
//! The session is the sole owner of the token pair. Callers that hit an
//! authorization failure hand their last-seen generation back to the session;
//! the first one through the gate performs the refresh, everyone queued
//! behind it adopts that refresh's outcome instead of issuing its own call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info, warn};

use super::traits::TokenRefresher;
use super::types::{SessionStatus, TokenPair};

/// Error type for session operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No token pair held (never signed in, signed out, or discarded after a
    /// failed refresh).
    #[error("Not authenticated (no token pair)")]
    NotAuthenticated,

    /// The refresh call could not complete (network, server failure).
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// The server rejected the refresh token itself.
    #[error("Refresh token rejected: {0}")]
    RefreshRejected(String),
}

/// Owner of the process-wide token pair.
///
/// State machine: `SignedOut → Active → Refreshing → {Active, ReauthRequired}`,
/// published on a watch channel for the collaborator handling session UI.
/// The pair is mutated only by [`sign_in`](Self::sign_in),
/// [`sign_out`](Self::sign_out), and the refresh transition; a generation
/// counter orders token reads after the most recent transition.
pub struct AuthSession {
    refresher: Arc<dyn TokenRefresher>,
    tokens: RwLock<Option<TokenPair>>,
    /// Bumped on every successful sign-in or refresh.
    generation: AtomicU64,
    /// Serializes refresh attempts (single-flight).
    refresh_gate: Mutex<()>,
    status: watch::Sender<SessionStatus>,
}

impl AuthSession {
    #[must_use]
    pub fn new(refresher: Arc<dyn TokenRefresher>) -> Self {
        let (status, _) = watch::channel(SessionStatus::SignedOut);
        Self {
            refresher,
            tokens: RwLock::new(None),
            generation: AtomicU64::new(0),
            refresh_gate: Mutex::new(()),
            status,
        }
    }

    /// Observe session status transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Current status snapshot.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Store a fresh token pair after interactive sign-in.
    pub async fn sign_in(&self, pair: TokenPair) {
        *self.tokens.write().await = Some(pair);
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.status.send_replace(SessionStatus::Active);
        info!("session signed in");
    }

    /// Discard the token pair.
    pub async fn sign_out(&self) {
        *self.tokens.write().await = None;
        self.status.send_replace(SessionStatus::SignedOut);
        info!("session signed out");
    }

    /// Whether a token pair is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    /// Current access token plus the generation it belongs to.
    ///
    /// Callers keep the generation and hand it back via
    /// [`refresh_after_unauthorized`](Self::refresh_after_unauthorized) when
    /// the server rejects the token.
    ///
    /// # Errors
    /// Returns [`SessionError::NotAuthenticated`] if no pair is held.
    pub async fn access_token(&self) -> Result<(String, u64), SessionError> {
        let tokens = self.tokens.read().await;
        let pair = tokens.as_ref().ok_or(SessionError::NotAuthenticated)?;
        Ok((pair.access_token.clone(), self.generation.load(Ordering::Acquire)))
    }

    /// Refresh the pair after the server rejected the access token of
    /// `seen_generation`.
    ///
    /// Exactly one refresh call is made per generation: the first caller
    /// through the gate performs it, callers queued behind adopt its outcome.
    /// On success the new access token is returned; on failure the pair is
    /// discarded, `ReauthRequired` is published, and every queued caller
    /// fails.
    ///
    /// # Errors
    /// Returns the refresh failure, or [`SessionError::NotAuthenticated`]
    /// when the pair was already discarded by a failed refresh or sign-out.
    pub async fn refresh_after_unauthorized(
        &self,
        seen_generation: u64,
    ) -> Result<String, SessionError> {
        let _gate = self.refresh_gate.lock().await;

        // A refresh finished while we waited for the gate; use its result.
        if self.generation.load(Ordering::Acquire) != seen_generation {
            let tokens = self.tokens.read().await;
            return tokens
                .as_ref()
                .map(|pair| pair.access_token.clone())
                .ok_or(SessionError::NotAuthenticated);
        }

        let refresh_token = {
            let tokens = self.tokens.read().await;
            tokens.as_ref().ok_or(SessionError::NotAuthenticated)?.refresh_token.clone()
        };

        self.status.send_replace(SessionStatus::Refreshing);
        debug!("access token rejected, refreshing");

        match self.refresher.exchange_refresh_token(&refresh_token).await {
            Ok(pair) => {
                let access = pair.access_token.clone();
                *self.tokens.write().await = Some(pair);
                self.generation.fetch_add(1, Ordering::AcqRel);
                self.status.send_replace(SessionStatus::Active);
                info!("token refresh succeeded");
                Ok(access)
            }
            Err(err) => {
                *self.tokens.write().await = None;
                self.status.send_replace(SessionStatus::ReauthRequired);
                warn!(error = %err, "token refresh failed, re-authentication required");
                Err(err)
            }
        }
    }
}
