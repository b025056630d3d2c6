//! Per-entry notification sinks.

use dirlist_core::Notification;
use tokio::sync::broadcast;

/// Receives one notification per accepted entry, synchronously, in walk order.
pub trait Notify {
    fn notify(&mut self, notification: &Notification);
}

impl<F> Notify for F
where
    F: FnMut(&Notification),
{
    fn notify(&mut self, notification: &Notification) {
        self(notification)
    }
}

/// Collects notifications in memory.
impl Notify for Vec<Notification> {
    fn notify(&mut self, notification: &Notification) {
        self.push(notification.clone());
    }
}

/// Forwards notifications to subscribers. Sending with no live receiver is not an error.
impl Notify for broadcast::Sender<Notification> {
    fn notify(&mut self, notification: &Notification) {
        let _ = self.send(notification.clone());
    }
}

/// Create a broadcast channel suitable for streaming notifications.
pub fn notification_channel(
    capacity: usize,
) -> (broadcast::Sender<Notification>, broadcast::Receiver<Notification>) {
    broadcast::channel(capacity.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification {
            handle: "/a/x.txt".into(),
            relative_name: Some("x.txt".into()),
        }
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |n: &Notification| seen.push(n.handle.clone());
            sink.notify(&sample());
        }
        assert_eq!(seen, vec!["/a/x.txt".to_string()]);
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Notification> = Vec::new();
        sink.notify(&sample());
        assert_eq!(sink, vec![sample()]);
    }

    #[test]
    fn test_broadcast_sink() {
        let (mut tx, mut rx) = notification_channel(8);
        tx.notify(&sample());
        assert_eq!(rx.try_recv().unwrap(), sample());
    }

    #[test]
    fn test_broadcast_without_receivers() {
        let (mut tx, rx) = notification_channel(8);
        drop(rx);
        tx.notify(&sample());
    }
}
