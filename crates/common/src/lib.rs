//! Runtime primitives shared across Registra crates.
//!
//! This crate contains:
//! - The token session: owner of the process-wide token pair, with
//!   single-flight refresh coordination
//! - The tagged read cache with per-entry staleness
//! - A time abstraction for deterministic tests
//!
//! ## Architecture
//! - No dependencies on other Registra crates
//! - Modules define their own error types; the client crate maps them into
//!   the domain error taxonomy at its boundary

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod auth;
pub mod cache;
pub mod time;

pub use auth::{AuthSession, SessionError, SessionStatus, TokenPair, TokenRefresher, TokenResponse};
pub use cache::TaggedCache;
pub use time::{Clock, MockClock, SystemClock};
