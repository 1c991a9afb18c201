//! Transient toast notifications.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

/// Default time a toast stays visible.
pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_millis(4000);

/// Severity of a toast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
    Warning,
}

impl ToastLevel {
    /// Lowercase label for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// A queued toast message.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Monotonically increasing identifier.
    pub id: u64,
    pub text: String,
    pub level: ToastLevel,
    pub timeout: Duration,
}

/// Queue of toast messages with auto-expiry.
///
/// Messages are held in show order (FIFO). Each message with a non-zero
/// timeout schedules its own removal; messages can also be dismissed by id
/// or cleared en masse.
#[derive(Clone)]
pub struct ToastStore {
    inner: Arc<ToastInner>,
}

struct ToastInner {
    tx: watch::Sender<Vec<Toast>>,
    counter: AtomicU64,
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastStore {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(ToastInner {
                tx,
                counter: AtomicU64::new(0),
            }),
        }
    }

    /// Queue a message with the default timeout. Returns its id.
    ///
    /// Must be called within a tokio runtime: expiry is a spawned timer.
    pub fn show(&self, text: impl Into<String>, level: ToastLevel) -> u64 {
        self.show_for(text, level, DEFAULT_TOAST_TIMEOUT)
    }

    /// Queue a message with an explicit timeout. A zero timeout disables
    /// auto-expiry, leaving dismissal to the caller.
    pub fn show_for(&self, text: impl Into<String>, level: ToastLevel, timeout: Duration) -> u64 {
        let id = self.inner.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let toast = Toast {
            id,
            text: text.into(),
            level,
            timeout,
        };

        self.inner.tx.send_modify(|messages| messages.push(toast));

        if !timeout.is_zero() {
            let store = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                store.dismiss(id);
            });
        }

        id
    }

    /// Dismiss one message by id. A no-op when already gone.
    pub fn dismiss(&self, id: u64) {
        self.inner.tx.send_if_modified(|messages| {
            let before = messages.len();
            messages.retain(|toast| toast.id != id);
            messages.len() != before
        });
    }

    /// Drop every queued message.
    pub fn clear(&self) {
        self.inner.tx.send_if_modified(|messages| {
            if messages.is_empty() {
                false
            } else {
                messages.clear();
                true
            }
        });
    }

    /// Snapshot of the queue in show order.
    #[must_use]
    pub fn messages(&self) -> Vec<Toast> {
        self.inner.tx.borrow().clone()
    }

    /// Subscribe to queue changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_queues_in_fifo_order() {
        let toasts = ToastStore::new();
        toasts.show("first", ToastLevel::Info);
        toasts.show("second", ToastLevel::Success);

        let texts: Vec<_> = toasts.messages().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_increasing() {
        let toasts = ToastStore::new();
        let a = toasts.show("a", ToastLevel::Info);
        let b = toasts.show("b", ToastLevel::Info);
        assert!(b > a);
    }

    #[tokio::test]
    async fn test_dismiss_removes_only_that_id() {
        let toasts = ToastStore::new();
        let a = toasts.show_for("a", ToastLevel::Info, Duration::ZERO);
        let _b = toasts.show_for("b", ToastLevel::Info, Duration::ZERO);

        toasts.dismiss(a);

        let remaining = toasts.messages();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.first().map(|t| t.text.clone()), Some("b".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_messages_expire_after_their_timeout() {
        let toasts = ToastStore::new();
        toasts.show_for("short", ToastLevel::Info, Duration::from_millis(100));
        toasts.show_for("long", ToastLevel::Info, Duration::from_millis(5000));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let texts: Vec<_> = toasts.messages().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["long"]);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(toasts.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_never_expires() {
        let toasts = ToastStore::new();
        toasts.show_for("sticky", ToastLevel::Warning, Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(toasts.messages().len(), 1);

        toasts.clear();
        assert!(toasts.messages().is_empty());
    }
}
