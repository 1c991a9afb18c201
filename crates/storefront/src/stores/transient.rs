//! Auto-clearing status messages.
//!
//! Inline form errors (login, profile) show for a fixed delay and then
//! disappear on their own. Each `set` supersedes the previous message and
//! its pending clear.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

/// A single status message that clears itself after a delay.
#[derive(Clone)]
pub struct TransientMessage {
    inner: Arc<TransientInner>,
}

struct TransientInner {
    tx: watch::Sender<Option<String>>,
    generation: AtomicU64,
}

impl Default for TransientMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl TransientMessage {
    /// Create with no message set.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(TransientInner {
                tx,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Set the message and schedule it to clear after `clear_after`.
    ///
    /// A later `set` wins over an earlier pending clear. Must be called
    /// within a tokio runtime.
    pub fn set(&self, message: impl Into<String>, clear_after: Duration) {
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.tx.send_replace(Some(message.into()));

        if clear_after.is_zero() {
            return;
        }

        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(clear_after).await;
            // Only clear if no newer message replaced this one
            if this.inner.generation.load(Ordering::Relaxed) == generation {
                this.clear();
            }
        });
    }

    /// Clear the message immediately.
    pub fn clear(&self) {
        self.inner.tx.send_if_modified(|message| {
            if message.is_none() {
                false
            } else {
                *message = None;
                true
            }
        });
    }

    /// The current message, if one is showing.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.inner.tx.borrow().clone()
    }

    /// Subscribe to message changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.inner.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_message_clears_after_delay() {
        let status = TransientMessage::new();
        status.set("Login failed.", Duration::from_secs(5));
        assert_eq!(status.message().as_deref(), Some("Login failed."));

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(status.message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_message_survives_older_clear() {
        let status = TransientMessage::new();
        status.set("first", Duration::from_secs(2));

        tokio::time::sleep(Duration::from_secs(1)).await;
        status.set("second", Duration::from_secs(5));

        // The first message's timer fires now, but must not clear "second"
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(status.message().as_deref(), Some("second"));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(status.message().is_none());
    }

    #[tokio::test]
    async fn test_zero_delay_is_sticky() {
        let status = TransientMessage::new();
        status.set("sticky", Duration::ZERO);
        assert_eq!(status.message().as_deref(), Some("sticky"));

        status.clear();
        assert!(status.message().is_none());
    }
}
