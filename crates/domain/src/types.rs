//! Server-owned resource records mirrored by the client
//!
//! Every record carries a monotonically increasing `version` used for
//! optimistic concurrency, plus audit fields maintained by the server.
//! The client holds copies only; field names follow the wire (camelCase).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub grade_level: i32,
    /// Optimistic-concurrency version; never decreases.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// Payload for creating a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub grade_level: i32,
}

/// Payload for updating a student. The caller's last-known `version` travels
/// separately (see the update operation) and is merged into the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub grade_level: i32,
}

/// A configuration setting record.
///
/// `category` is a server-owned vocabulary (e.g. `GENERAL`) and is kept as a
/// plain string so the client never rejects categories it hasn't seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSetting {
    pub id: i64,
    pub category: String,
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// Payload for creating a configuration setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConfigSetting {
    pub category: String,
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for updating a configuration setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSettingUpdate {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Paged list envelope returned by list endpoints.
///
/// `page` is a zero-based index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// An empty first page, useful as a neutral default in tests and views.
    #[must_use]
    pub fn empty(size: u32) -> Self {
        Self { content: Vec::new(), page: 0, size, total_elements: 0, total_pages: 0, first: true, last: true }
    }
}
