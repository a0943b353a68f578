//! API client: cached reads, token refresh, and mutations

mod client;
mod refresh;
mod resources;

pub use client::{ApiClient, ApiClientBuilder};
pub use refresh::HttpTokenRefresher;
pub use resources::{item_tag, Resource, SettingsApi, StudentsApi};
