//! RideOps Console Core
//!
//! Headless core of an operations console for a ride-sharing platform.
//! All state of record lives behind the platform's admin REST API and its
//! websocket push channel; this crate owns the client-side lifecycle around
//! them.
//!
//! # Features
//!
//! - **Session lifecycle**: login/logout/refresh state machine with
//!   coalesced token refresh and logout-wins semantics
//! - **Credential persistence**: one session blob, restored at startup
//! - **Realtime alerts**: websocket channel gated on authentication, with
//!   backoff reconnect
//! - **Notification queue**: ordered alerts, 5s transient expiry, explicit
//!   acknowledgement for critical ones
//! - **Resource gateway**: typed errors and pagination normalization for
//!   every admin endpoint
//! - **List controllers**: generation-counted fetches so stale responses
//!   never clobber current view state
//!
//! # Architecture
//!
//! ```text
//! Credential Store ──► Session Manager ──► Resource Gateway ──► admin REST API
//!                         │      ▲                 ▲
//!                         │      └── refresh ◄─────┤ 401
//!                         ▼                        │
//!                  Realtime Channel          List Controllers
//!                         │
//!                         ▼
//!                  Notification Center ──► render layers (subscribe-only)
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod realtime;
pub mod session;
pub mod store;

pub use config::Config;
pub use controller::{ListController, ListState};
pub use error::GatewayError;
pub use gateway::{Page, Pagination, ResourceGateway};
pub use notify::{Category, Notification, NotificationCenter};
pub use realtime::{ConnectionState, RealtimeChannel, RealtimeEvent};
pub use session::{AdminIdentity, AuthState, Session, SessionManager};
pub use store::CredentialStore;
