//! Realtime Channel
//!
//! Websocket push connection for server-initiated events, alive only while a
//! session exists. Follows the session manager's authenticated signal:
//! connects on login (or restored session), tears the socket down on logout.
//! Transport drops while authenticated trigger reconnection with exponential
//! backoff; every recognized event is forwarded to the notification center
//! verbatim, with no filtering or deduplication here.

use crate::notify::{Category, NotificationCenter};
use crate::session::SessionManager;
use futures_util::StreamExt;
use serde::Deserialize;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection lifecycle, observable by render layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Server-initiated events, as delivered on the wire:
/// `{"event": "sos_alert", "data": {"user_name": ..., "ride_id": ...}}`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RealtimeEvent {
    SosAlert {
        user_name: Option<String>,
        ride_id: u64,
    },
    NewReport {
        ride_id: u64,
    },
}

/// Reconnect schedule: exponential with jitter, reset after a successful
/// connect. Never hot-loops.
struct Backoff {
    base: Duration,
    max: Duration,
    attempt: u32,
}

impl Backoff {
    fn new() -> Self {
        Self {
            base: Duration::from_millis(500),
            max: Duration::from_secs(30),
            attempt: 0,
        }
    }

    fn reset(&mut self) {
        self.attempt = 0;
    }

    fn next_delay(&mut self) -> Duration {
        let exp = self.base.as_secs_f64() * 2f64.powi(self.attempt as i32);
        let capped = exp.min(self.max.as_secs_f64());
        self.attempt = self.attempt.saturating_add(1);

        // +/- 20% jitter so a fleet of consoles doesn't reconnect in lockstep
        let jitter = capped * 0.2 * (rand_simple() * 2.0 - 1.0);
        Duration::from_secs_f64((capped + jitter).max(0.05))
    }
}

/// Cheap jitter source; not worth a rand dependency
fn rand_simple() -> f64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64,
    );
    (hasher.finish() as f64) / (u64::MAX as f64)
}

/// Handle to the background connection task. Dropping it aborts the task.
pub struct RealtimeChannel {
    state_rx: watch::Receiver<ConnectionState>,
    task: JoinHandle<()>,
}

impl RealtimeChannel {
    /// Spawn the connection loop. It idles until the session manager signals
    /// Authenticated, then maintains the socket until logout.
    pub fn spawn(
        socket_url: String,
        session: SessionManager,
        notifier: NotificationCenter,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let task = tokio::spawn(run_channel(socket_url, session, notifier, state_tx));
        Self { state_rx, task }
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for RealtimeChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_channel(
    socket_url: String,
    session: SessionManager,
    notifier: NotificationCenter,
    state_tx: watch::Sender<ConnectionState>,
) {
    let mut auth = session.subscribe();

    loop {
        // Idle until a session exists
        while !*auth.borrow_and_update() {
            state_tx.send_replace(ConnectionState::Disconnected);
            if auth.changed().await.is_err() {
                return; // session manager gone
            }
        }

        let mut backoff = Backoff::new();

        while *auth.borrow_and_update() {
            let token = match session.access_token() {
                Some(token) => token,
                None => break,
            };
            state_tx.send_replace(ConnectionState::Connecting);
            // Current token each attempt, so a mid-session refresh is picked
            // up on the next (re)connect
            let url = format!("{}?token={}", socket_url, token);

            tokio::select! {
                connected = connect_async(url.as_str()) => match connected {
                    Ok((ws, _)) => {
                        info!("Realtime channel connected");
                        state_tx.send_replace(ConnectionState::Connected);
                        backoff.reset();

                        read_until_drop(ws, &mut auth, &notifier).await;
                        state_tx.send_replace(ConnectionState::Disconnected);

                        if !*auth.borrow_and_update() {
                            break;
                        }
                        let delay = backoff.next_delay();
                        warn!("Realtime connection lost, reconnecting in {:?}", delay);
                        if !sleep_while_authenticated(delay, &mut auth).await {
                            break;
                        }
                    }
                    Err(e) => {
                        state_tx.send_replace(ConnectionState::Disconnected);
                        let delay = backoff.next_delay();
                        warn!("Realtime connect failed ({}), retrying in {:?}", e, delay);
                        if !sleep_while_authenticated(delay, &mut auth).await {
                            break;
                        }
                    }
                },
                _ = wait_unauthenticated(&mut auth) => break,
            }
        }

        state_tx.send_replace(ConnectionState::Disconnected);
        debug!("Realtime channel torn down");
    }
}

/// Read frames until the socket drops or the session ends. Logout closes the
/// socket explicitly rather than abandoning it.
async fn read_until_drop(
    mut ws: WsStream,
    auth: &mut watch::Receiver<bool>,
    notifier: &NotificationCenter,
) {
    loop {
        tokio::select! {
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => handle_frame(&text, notifier),
                Some(Ok(Message::Close(_))) | None => return,
                Some(Ok(_)) => {} // ping/pong/binary: nothing to surface
                Some(Err(e)) => {
                    debug!("Realtime read error: {}", e);
                    return;
                }
            },
            _ = wait_unauthenticated(auth) => {
                let _ = ws.close(None).await;
                return;
            }
        }
    }
}

fn handle_frame(text: &str, notifier: &NotificationCenter) {
    match serde_json::from_str::<RealtimeEvent>(text) {
        Ok(RealtimeEvent::SosAlert { user_name, ride_id }) => {
            let who = user_name.as_deref().unwrap_or("a user");
            notifier.post(
                Category::Critical,
                "EMERGENCY SIGNAL",
                &format!(
                    "An SOS alert has been triggered by {} on ride #{}.",
                    who, ride_id
                ),
            );
        }
        Ok(RealtimeEvent::NewReport { ride_id }) => {
            notifier.post(
                Category::Warning,
                "New Incident Reported",
                &format!("A new report has been filed regarding ride #{}.", ride_id),
            );
        }
        Err(e) => debug!("Unrecognized realtime frame, dropping: {}", e),
    }
}

/// Resolve once the session signal reads false. Pends forever if the sender
/// is gone while authenticated (the task is aborted with its handle anyway).
async fn wait_unauthenticated(auth: &mut watch::Receiver<bool>) {
    loop {
        if !*auth.borrow_and_update() {
            return;
        }
        if auth.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Backoff sleep that aborts early on logout. Returns false if the session
/// ended during the wait.
async fn sleep_while_authenticated(delay: Duration, auth: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = wait_unauthenticated(auth) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parses_sos_alert() {
        let frame = r#"{"event":"sos_alert","data":{"user_name":"Hanna","ride_id":42}}"#;
        let event: RealtimeEvent = serde_json::from_str(frame).unwrap();
        match event {
            RealtimeEvent::SosAlert { user_name, ride_id } => {
                assert_eq!(user_name.as_deref(), Some("Hanna"));
                assert_eq!(ride_id, 42);
            }
            other => panic!("wrong event: {:?}", other),
        }
    }

    #[test]
    fn test_event_parses_new_report() {
        let frame = r#"{"event":"new_report","data":{"ride_id":7}}"#;
        let event: RealtimeEvent = serde_json::from_str(frame).unwrap();
        assert!(matches!(event, RealtimeEvent::NewReport { ride_id: 7 }));
    }

    #[test]
    fn test_sos_alert_tolerates_missing_user_name() {
        let frame = r#"{"event":"sos_alert","data":{"ride_id":3}}"#;
        let event: RealtimeEvent = serde_json::from_str(frame).unwrap();
        assert!(matches!(
            event,
            RealtimeEvent::SosAlert { user_name: None, ride_id: 3 }
        ));
    }

    #[test]
    fn test_unknown_event_is_an_error() {
        let frame = r#"{"event":"ride_started","data":{"ride_id":3}}"#;
        assert!(serde_json::from_str::<RealtimeEvent>(frame).is_err());
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let mut backoff = Backoff::new();
        let first = backoff.next_delay();
        let second = backoff.next_delay();
        // jitter is +/-20%, so a strict doubling check needs headroom
        assert!(second > first / 2);
        for _ in 0..20 {
            let d = backoff.next_delay();
            assert!(d <= Duration::from_secs(37)); // 30s cap + 20% jitter
        }
    }

    #[tokio::test]
    async fn test_frame_posts_critical_notification() {
        let notifier = NotificationCenter::new();
        handle_frame(
            r#"{"event":"sos_alert","data":{"user_name":"Hanna","ride_id":42}}"#,
            &notifier,
        );
        let queue = notifier.snapshot();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].category, Category::Critical);
        assert!(queue[0].body.contains("ride #42"));
    }

    #[tokio::test]
    async fn test_unrecognized_frame_posts_nothing() {
        let notifier = NotificationCenter::new();
        handle_frame("not json", &notifier);
        handle_frame(r#"{"event":"ride_started","data":{}}"#, &notifier);
        assert!(notifier.snapshot().is_empty());
    }
}
