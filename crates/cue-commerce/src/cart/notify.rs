//! User-facing notifications raised by cart interactions.

use std::sync::{Mutex, PoisonError};

/// A transient success message for the shopper (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fire-and-forget sink for notifications.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Emits notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!("{}", notification.message);
    }
}

/// Collects notifications for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::new("Taco X added to cart"));
        notifier.notify(Notification::new("Tiza added to cart"));

        let received = notifier.received();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].message, "Taco X added to cart");
    }

    #[test]
    fn test_drain_empties() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::new("Taco X added to cart"));

        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.received().is_empty());
    }

    #[test]
    fn test_notifier_through_reference() {
        let notifier = RecordingNotifier::new();
        let by_ref = &notifier;
        by_ref.notify(Notification::new("ok"));
        assert_eq!(notifier.received().len(), 1);
    }
}
