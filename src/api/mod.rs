//! Typed Admin API
//!
//! Thin per-resource wrappers over the [`ResourceGateway`](crate::gateway::ResourceGateway).
//! Each function maps one backend endpoint: path, query, body, and the typed
//! response. Controllers call these through
//! [`SessionManager::authorized`](crate::session::SessionManager::authorized)
//! so the retry-after-refresh policy applies uniformly.

pub mod companies;
pub mod payments;
pub mod platform;
pub mod reports;
pub mod rides;
pub mod users;
pub mod verifications;

use serde::Deserialize;

/// Mutation acknowledgement: `{message}` with no entity attached
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub message: String,
}
