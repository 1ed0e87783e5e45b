//! Authentication state notifications.

use tokio::sync::broadcast;

/// Events published by the request pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The backend rejected the stored credentials; they have been cleared.
    Unauthorized,
}

/// Broadcast channel for [`AuthEvent`]s.
///
/// Handed to the pipeline at construction; UI layers subscribe to it.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribe to events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Returns how many subscribers received it.
    pub fn publish(&self, event: AuthEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_publish_without_subscribers() {
        let events = AuthEvents::new();
        assert_eq!(events.publish(AuthEvent::Unauthorized), 0);
    }

    #[test]
    fn test_each_subscriber_sees_event_once() {
        let events = AuthEvents::new();
        let mut a = events.subscribe();
        let mut b = events.clone().subscribe();

        assert_eq!(events.publish(AuthEvent::Unauthorized), 2);
        assert_eq!(a.try_recv().unwrap(), AuthEvent::Unauthorized);
        assert_eq!(b.try_recv().unwrap(), AuthEvent::Unauthorized);
        assert!(matches!(a.try_recv(), Err(TryRecvError::Empty)));
    }
}
