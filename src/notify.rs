//! Notification Center
//!
//! Ordered in-memory queue of operator-facing alerts. Transient categories
//! self-expire 5 seconds after posting; critical alerts stay until an
//! operator acknowledges them. Render layers observe the queue through a
//! watch subscription and never mutate it directly.

use crate::error::GatewayError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

/// How long non-critical notifications stay visible, measured from `post`
const TRANSIENT_TTL: Duration = Duration::from_millis(5000);

/// Notification severity / display class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Requires explicit operator acknowledgement (e.g. an SOS alert)
    Critical,
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub category: Category,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

struct Inner {
    queue: Mutex<Vec<Notification>>,
    feed: watch::Sender<Vec<Notification>>,
}

/// Queue owner; the only component that appends or removes notifications
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (feed, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(Vec::new()),
                feed,
            }),
        }
    }

    /// Append a notification. Non-critical entries are scheduled for removal
    /// after the transient TTL regardless of later interaction.
    ///
    /// Must be called from within a tokio runtime (the expiry timer is a
    /// spawned task).
    pub fn post(&self, category: Category, title: &str, body: &str) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            category,
            title: title.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        };
        let id = notification.id;

        {
            let mut queue = self.inner.queue.lock();
            queue.push(notification);
            self.inner.feed.send_replace(queue.clone());
        }
        debug!("Notification posted: {:?} {}", category, title);

        if category != Category::Critical {
            let center = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(TRANSIENT_TTL).await;
                center.acknowledge(id);
            });
        }

        id
    }

    /// Remove a notification immediately, whatever its category. Unknown or
    /// already-removed ids are a no-op.
    pub fn acknowledge(&self, id: Uuid) {
        let mut queue = self.inner.queue.lock();
        let before = queue.len();
        queue.retain(|n| n.id != id);
        if queue.len() != before {
            self.inner.feed.send_replace(queue.clone());
            debug!("Notification acknowledged: {}", id);
        }
    }

    /// Surface a failed action as a transient notice. Server and transport
    /// failures get the generic toast; everything else (validation, auth) is
    /// the caller's to show inline or resolve, and posts nothing here.
    pub fn report_failure(&self, action: &str, err: &GatewayError) -> Option<Uuid> {
        if !err.is_transient() {
            return None;
        }
        Some(self.post(
            Category::Warning,
            "Action failed",
            &format!("{} did not complete: {}. Please retry.", action, err),
        ))
    }

    /// Current queue in display order (insertion order)
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner.queue.lock().clone()
    }

    /// Observe queue snapshots; the initial value is the current queue
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.feed.subscribe()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_transient_notification_expires_after_ttl() {
        let center = NotificationCenter::new();
        center.post(Category::Success, "Saved", "User updated");
        assert_eq!(center.snapshot().len(), 1);

        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert!(center.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_critical_notification_never_expires() {
        let center = NotificationCenter::new();
        let id = center.post(Category::Critical, "EMERGENCY", "SOS on ride #12");

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(center.snapshot().len(), 1);

        center.acknowledge(id);
        assert!(center.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_acknowledge_is_idempotent() {
        let center = NotificationCenter::new();
        let id = center.post(Category::Critical, "EMERGENCY", "SOS");
        center.acknowledge(id);
        center.acknowledge(id);
        center.acknowledge(Uuid::new_v4());
        assert!(center.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_removal_preserves_insertion_order() {
        let center = NotificationCenter::new();
        let a = center.post(Category::Critical, "a", "");
        let b = center.post(Category::Critical, "b", "");
        let c = center.post(Category::Critical, "c", "");

        center.acknowledge(b);
        let titles: Vec<_> = center.snapshot().iter().map(|n| n.title.clone()).collect();
        assert_eq!(titles, vec!["a", "c"]);

        // survivors keep their ids
        let ids: Vec<_> = center.snapshot().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_snapshots() {
        let center = NotificationCenter::new();
        let mut feed = center.subscribe();
        assert!(feed.borrow().is_empty());

        center.post(Category::Info, "hello", "");
        feed.changed().await.unwrap();
        assert_eq!(feed.borrow().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_failure_posts_only_for_transient_errors() {
        let center = NotificationCenter::new();

        let posted = center.report_failure(
            "Cancel ride",
            &GatewayError::Server { status: 500, message: "boom".into() },
        );
        assert!(posted.is_some());
        assert_eq!(center.snapshot()[0].category, Category::Warning);

        assert!(center
            .report_failure("Cancel ride", &GatewayError::Validation("bad id".into()))
            .is_none());
        assert!(center
            .report_failure("Cancel ride", &GatewayError::Unauthorized)
            .is_none());
        assert_eq!(center.snapshot().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_expiry_only_removes_transients() {
        let center = NotificationCenter::new();
        center.post(Category::Critical, "sos", "");
        center.post(Category::Warning, "report", "");
        center.post(Category::Info, "fyi", "");

        tokio::time::sleep(Duration::from_millis(5100)).await;
        let remaining = center.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "sos");
    }
}
