//! Auth Session Manager
//!
//! Single source of truth for "who is logged in and with what token" and the
//! only component that mutates the session. Owns the state machine
//!
//! ```text
//! Unauthenticated -> Authenticating -> Authenticated
//!                                        |    ^
//!                                        v    |
//!                                      Refreshing -> Unauthenticated
//! ```
//!
//! Concurrency contract: `refresh()` is coalesced — however many callers hit
//! a 401 at once, one network call is issued and all awaiters share its
//! outcome. A logout while a refresh is in flight always wins; the late
//! resolution is discarded.

use crate::error::GatewayError;
use crate::gateway::ResourceGateway;
use crate::store::CredentialStore;
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// The authenticated admin's identity plus token pair. Both tokens are
/// always replaced together, never independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub identity: AdminIdentity,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: u64,
    pub display_name: String,
    pub role: String,
}

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Refreshing,
}

/// Wire shape of `POST /auth/login`
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    refresh_token: String,
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    id: u64,
    first_name: String,
    last_name: String,
}

/// Wire shape of `POST /auth/refresh`
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenPair {
    access_token: String,
    refresh_token: String,
}

struct StateSlot {
    auth: AuthState,
    session: Option<Session>,
}

type SharedRefresh = Shared<BoxFuture<'static, Option<String>>>;

struct SessionInner {
    gateway: ResourceGateway,
    store: CredentialStore,
    state: RwLock<StateSlot>,
    /// Single in-progress refresh; concurrent callers attach instead of
    /// issuing their own network call
    refresh_slot: Mutex<Option<SharedRefresh>>,
    /// Bumped on every logout; a refresh resolving under a stale epoch is
    /// discarded
    epoch: AtomicU64,
    /// true while Authenticated/Refreshing; gates the realtime channel
    auth_signal: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    /// Hydrates synchronously from the credential store: a stored session
    /// yields Authenticated before any consumer sees the manager.
    pub fn new(gateway: ResourceGateway, store: CredentialStore) -> Self {
        let session: Option<Session> = store.load();
        if session.is_some() {
            info!("Session restored from credential store");
        }
        let auth = if session.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        let (auth_signal, _) = watch::channel(session.is_some());

        Self {
            inner: Arc::new(SessionInner {
                gateway,
                store,
                state: RwLock::new(StateSlot { auth, session }),
                refresh_slot: Mutex::new(None),
                epoch: AtomicU64::new(0),
                auth_signal,
            }),
        }
    }

    pub fn state(&self) -> AuthState {
        self.inner.state.read().auth
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), AuthState::Authenticated | AuthState::Refreshing)
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub fn identity(&self) -> Option<AdminIdentity> {
        self.inner
            .state
            .read()
            .session
            .as_ref()
            .map(|s| s.identity.clone())
    }

    /// Authenticated-state signal; flips to false on logout or irrecoverable
    /// refresh failure. The realtime channel follows this.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.auth_signal.subscribe()
    }

    /// Authenticate against `POST /auth/login`.
    ///
    /// `Ok(false)` means the credentials were rejected — an expected outcome
    /// the caller shows inline. `Err(_)` is a transport or server failure,
    /// shown as a generic error. An identifier containing `@` is sent as
    /// `email`, anything else as `phone_number`.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<bool, GatewayError> {
        {
            let mut slot = self.inner.state.write();
            slot.auth = AuthState::Authenticating;
        }

        let body = if identifier.contains('@') {
            LoginRequest { email: Some(identifier), phone_number: None, password: secret }
        } else {
            LoginRequest { email: None, phone_number: Some(identifier), password: secret }
        };

        match self
            .inner
            .gateway
            .post::<LoginResponse, _>("/auth/login", None, Some(&body))
            .await
        {
            Ok(resp) => {
                let session = Session {
                    identity: AdminIdentity {
                        id: resp.user.id,
                        display_name: format!("{} {}", resp.user.first_name, resp.user.last_name),
                        role: "admin".to_string(),
                    },
                    access_token: resp.access_token,
                    refresh_token: resp.refresh_token,
                };
                self.inner.commit_session(session);
                info!("Login succeeded");
                Ok(true)
            }
            Err(GatewayError::Unauthorized) => {
                self.inner.reset_unauthenticated();
                debug!("Login rejected: invalid credentials");
                Ok(false)
            }
            Err(e) => {
                self.inner.reset_unauthenticated();
                Err(e)
            }
        }
    }

    /// Clear the session and signal dependents to disconnect. Idempotent;
    /// teardown is synchronous so no dependent outlives the session.
    pub fn logout(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        let had_session = {
            let mut slot = self.inner.state.write();
            let had = slot.session.take().is_some();
            slot.auth = AuthState::Unauthenticated;
            had
        };
        self.inner.store.clear();
        self.inner.auth_signal.send_replace(false);
        if had_session {
            info!("Logged out");
        }
    }

    /// Exchange the stored refresh token for a new access/refresh pair.
    ///
    /// Returns the new access token, or `None` if the refresh failed — in
    /// which case the session has been cleared and the caller should route
    /// the operator back to login. Concurrent callers coalesce onto a single
    /// network call and all observe the same outcome.
    pub async fn refresh(&self) -> Option<String> {
        let fut = {
            let mut slot = self.inner.refresh_slot.lock().await;
            match slot.as_ref() {
                Some(in_flight) => in_flight.clone(),
                None => {
                    let inner = Arc::clone(&self.inner);
                    let fut: SharedRefresh =
                        async move { SessionInner::run_refresh(inner).await }.boxed().shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };
        fut.await
    }

    /// Single retry-after-refresh policy: run `call` with the current token;
    /// on `Unauthorized`, refresh once and retry exactly once. Never loops.
    pub async fn authorized<T, F, Fut>(&self, call: F) -> Result<T, GatewayError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let token = self.access_token().ok_or(GatewayError::Unauthorized)?;
        match call(token).await {
            Err(GatewayError::Unauthorized) => match self.refresh().await {
                Some(fresh) => call(fresh).await,
                None => Err(GatewayError::Unauthorized),
            },
            other => other,
        }
    }
}

impl SessionInner {
    /// Install the new session: both tokens replaced together, persisted,
    /// state Authenticated, dependents signaled.
    fn commit_session(&self, session: Session) {
        {
            let mut slot = self.state.write();
            slot.session = Some(session.clone());
            slot.auth = AuthState::Authenticated;
        }
        self.store.save(&session);
        self.auth_signal.send_replace(true);
    }

    fn reset_unauthenticated(&self) {
        let mut slot = self.state.write();
        if slot.session.is_none() {
            slot.auth = AuthState::Unauthenticated;
        } else {
            // login raced a live session; leave it intact
            slot.auth = AuthState::Authenticated;
        }
    }

    /// The single refresh execution all concurrent callers share
    async fn run_refresh(inner: Arc<SessionInner>) -> Option<String> {
        let out = Self::do_refresh(&inner).await;
        // Clear the slot exactly once, whatever the outcome, so the next
        // 401 starts a fresh refresh instead of replaying this one
        let mut slot = inner.refresh_slot.lock().await;
        *slot = None;
        out
    }

    async fn do_refresh(inner: &Arc<SessionInner>) -> Option<String> {
        let epoch = inner.epoch.load(Ordering::SeqCst);

        let refresh_token = {
            let mut slot = inner.state.write();
            match slot.session.as_ref() {
                Some(session) => {
                    let refresh_token = session.refresh_token.clone();
                    slot.auth = AuthState::Refreshing;
                    refresh_token
                }
                None => return None,
            }
        };

        debug!("Refreshing access token");
        let body = RefreshRequest { refresh_token: &refresh_token };
        let result = inner
            .gateway
            .post::<TokenPair, _>("/auth/refresh", None, Some(&body))
            .await;

        // Logout wins: anything that resolved under a stale epoch is dropped
        if inner.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Refresh resolved after logout, discarding");
            return None;
        }

        match result {
            Ok(pair) => {
                let committed = {
                    let mut slot = inner.state.write();
                    // Re-check under the lock logout also takes
                    if inner.epoch.load(Ordering::SeqCst) != epoch {
                        false
                    } else {
                        match slot.session.as_mut() {
                            Some(session) => {
                                session.access_token = pair.access_token.clone();
                                session.refresh_token = pair.refresh_token;
                                slot.auth = AuthState::Authenticated;
                                true
                            }
                            None => false,
                        }
                    }
                };
                if !committed {
                    return None;
                }
                // Persist outside the lock
                let snapshot = inner.state.read().session.clone();
                if let Some(session) = snapshot {
                    inner.store.save(&session);
                }
                debug!("Access token refreshed");
                Some(pair.access_token)
            }
            Err(e) => {
                // Mirror the upstream console: a refresh that cannot
                // complete ends the session
                warn!("Token refresh failed, logging out: {}", e);
                inner.epoch.fetch_add(1, Ordering::SeqCst);
                {
                    let mut slot = inner.state.write();
                    slot.session = None;
                    slot.auth = AuthState::Unauthenticated;
                }
                inner.store.clear();
                inner.auth_signal.send_replace(false);
                None
            }
        }
    }
}
