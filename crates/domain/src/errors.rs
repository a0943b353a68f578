//! Error types used throughout the client
//!
//! Every failure crossing the transport boundary is normalized into one of
//! the [`ClientError`] kinds; callers never see raw HTTP or I/O errors.
//! Server failures arrive as RFC7807-style [`ProblemDetail`] documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// RFC7807-style problem document returned on any failure response.
///
/// Servers differ on whether field messages arrive under `fieldErrors` or
/// `errors`; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default, alias = "errors", skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

impl ProblemDetail {
    /// Best human-readable message in the document.
    #[must_use]
    pub fn message(&self) -> String {
        self.detail
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| format!("server returned status {}", self.status))
    }
}

/// Categories of client errors, used for reporting and retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Auth,
    Validation,
    Conflict,
    NotFound,
    Server,
    Config,
    Unknown,
}

/// Main error type for the Registra client.
///
/// `Clone` so that coalesced readers can all observe the same failure.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// No response received, connection failure, or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials rejected (403, or 401 that survived a refresh).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Structured field-level validation failure (400/422).
    #[error("Validation failed: {detail}")]
    Validation { detail: String, field_errors: Vec<FieldError> },

    /// Optimistic-concurrency version mismatch (409).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Server-side failure (5xx).
    #[error("Server error: {0}")]
    Server(String),

    /// Local configuration or wiring failure.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl ClientError {
    /// Classify an HTTP status and optional problem document.
    ///
    /// Implements the status table consumed by the core: 401/403 map to
    /// `Auth` (recoverable 401s are resolved by the session before this is
    /// reached), 404 to `NotFound`, 409 to `Conflict`, 400/422 to
    /// `Validation`, 5xx to `Server`. A missing or unparsable body still
    /// classifies by status.
    #[must_use]
    pub fn from_status(status: u16, problem: Option<ProblemDetail>) -> Self {
        let problem = problem.unwrap_or(ProblemDetail { status, ..ProblemDetail::default() });
        let message = problem.message();

        match status {
            401 | 403 => Self::Auth(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            400 | 422 => Self::Validation { detail: message, field_errors: problem.field_errors },
            s if (500..600).contains(&s) => Self::Server(message),
            _ => Self::Unknown(message),
        }
    }

    /// Get the error category for this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) => ErrorCategory::Network,
            Self::Auth(_) => ErrorCategory::Auth,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Conflict(_) => ErrorCategory::Conflict,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Server(_) => ErrorCategory::Server,
            Self::Config(_) => ErrorCategory::Config,
            Self::Unknown(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether the failure is transient and worth surfacing as a passing
    /// notice rather than a blocking error. Mutations are never retried
    /// automatically regardless of this value.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self.category(), ErrorCategory::Network | ErrorCategory::Server)
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
