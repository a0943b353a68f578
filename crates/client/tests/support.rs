//! Shared helpers for client integration tests
//!
//! Builds API clients against a WireMock server and canned wire payloads.

use registra_client::ApiClient;
use registra_common::TokenPair;
use registra_domain::Config;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const ACCESS_TOKEN: &str = "valid-token";
pub const REFRESH_TOKEN: &str = "refresh-token";

/// Client wired to the mock server, signed in with [`ACCESS_TOKEN`].
pub async fn signed_in_client(server: &MockServer) -> ApiClient {
    signed_in_client_with(server, |_| {}).await
}

/// Same, with a configuration tweak applied before building.
pub async fn signed_in_client_with(
    server: &MockServer,
    tweak: impl FnOnce(&mut Config),
) -> ApiClient {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.actor = "test-actor".to_string();
    tweak(&mut config);

    let client = ApiClient::builder().config(config).build().expect("api client");
    client
        .session()
        .sign_in(TokenPair::new(ACCESS_TOKEN.to_string(), REFRESH_TOKEN.to_string(), 3600))
        .await;
    client
}

pub fn student_json(id: i64, version: i64, last_name: &str) -> Value {
    json!({
        "id": id,
        "firstName": "Ada",
        "lastName": last_name,
        "email": format!("{}@example.edu", last_name.to_lowercase()),
        "gradeLevel": 10,
        "version": version,
        "createdAt": "2026-01-05T09:00:00Z",
        "updatedAt": "2026-02-01T10:30:00Z",
        "updatedBy": "registrar"
    })
}

pub fn setting_json(id: i64, version: i64, value: &str) -> Value {
    json!({
        "id": id,
        "category": "GENERAL",
        "key": "SCHOOL_NAME",
        "value": value,
        "version": version,
        "createdAt": "2026-01-05T09:00:00Z",
        "updatedAt": "2026-01-05T09:00:00Z",
        "updatedBy": "admin"
    })
}

pub fn page_json(content: Vec<Value>) -> Value {
    let total = content.len();
    json!({
        "content": content,
        "page": 0,
        "size": 20,
        "totalElements": total,
        "totalPages": 1,
        "first": true,
        "last": true
    })
}

pub fn problem_json(status: u16, detail: &str) -> Value {
    json!({
        "type": "about:blank",
        "title": "request failed",
        "status": status,
        "detail": detail,
        "timestamp": "2026-02-01T10:30:00Z",
        "correlationId": "it-correlation"
    })
}
