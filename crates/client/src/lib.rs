//! # Registra Client
//!
//! Resource-synchronization engine for the Registra API.
//!
//! This crate contains:
//! - The HTTP transport (header attachment, timeout, failure normalization)
//! - The API client: read-through cache with request coalescing, transparent
//!   token refresh with a single replay, and optimistic-concurrency mutations
//!   with targeted cache invalidation
//! - The search parameter model (canonicalization + debounce)
//! - The configuration loader
//!
//! ## Architecture
//! - Implements the refresh trait defined in `registra-common`
//! - Depends on `registra-domain` and `registra-common`
//! - Contains all I/O

pub mod api;
pub mod config;
pub mod http;
pub mod search;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder, HttpTokenRefresher, Resource, SettingsApi, StudentsApi};
pub use http::{Transport, TransportBuilder};
pub use search::{SearchModel, SearchParams};
