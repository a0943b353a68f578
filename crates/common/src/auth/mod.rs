//! Token session management
//!
//! Owns the process-wide access/refresh token pair and coordinates token
//! refresh so that concurrent authorization failures result in exactly one
//! refresh call.

mod session;
mod traits;
mod types;

pub use session::{AuthSession, SessionError};
pub use traits::TokenRefresher;
pub use types::{SessionStatus, TokenPair, TokenResponse};
