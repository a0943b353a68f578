//! Configuration structures
//!
//! Externally supplied values treated as immutable for the process lifetime.
//! Loading (environment/file) lives in the client crate.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default request timeout in seconds. Valid configured values are clamped
/// to the 10–30s range by the transport builder.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// Default staleness window for cached reads, in seconds.
pub const DEFAULT_STALE_AFTER_SECONDS: u64 = 60;

/// Default debounce window for filter edits, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Default page size for list reads.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub search: SearchSettings,
}

/// API endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the API (e.g. "https://api.registra.example").
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Actor identity sent on every request.
    pub actor: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            actor: "registra-client".to_string(),
        }
    }
}

/// Read-cache staleness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Staleness window applied when no per-type override exists.
    #[serde(default = "default_stale_after_seconds")]
    pub stale_after_seconds: u64,
    /// Per-resource-type overrides, keyed by resource type name
    /// (e.g. `setting` long, `student` short).
    #[serde(default)]
    pub stale_after_overrides: HashMap<String, u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_after_seconds: DEFAULT_STALE_AFTER_SECONDS,
            stale_after_overrides: HashMap::new(),
        }
    }
}

impl CacheSettings {
    /// Staleness window for a resource type.
    #[must_use]
    pub fn stale_after(&self, resource_type: &str) -> Duration {
        let seconds =
            self.stale_after_overrides.get(resource_type).copied().unwrap_or(self.stale_after_seconds);
        Duration::from_secs(seconds)
    }
}

/// Search parameter model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Quiet window before a burst of filter edits is emitted, in ms.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Page size used when callers don't specify one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { debounce_ms: DEFAULT_DEBOUNCE_MS, default_page_size: DEFAULT_PAGE_SIZE }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_stale_after_seconds() -> u64 {
    DEFAULT_STALE_AFTER_SECONDS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
