use tokio::sync::broadcast;

use crate::models::user::User;

/// A change in authentication state.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut { uid: String },
}

/// Broadcast stream of authentication activity.
///
/// Sign-ins and sign-outs are published here by the auth handlers.
/// Consumers call [`AuthEvents::subscribe`] and receive every event
/// published afterwards; dropping the returned stream unsubscribes.
#[derive(Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribe to future auth events.
    pub fn subscribe(&self) -> AuthEventStream {
        AuthEventStream {
            rx: self.tx.subscribe(),
        }
    }

    /// Publish an event. A send with no live subscribers is fine.
    pub fn publish(&self, event: AuthEvent) {
        let _ = self.tx.send(event);
    }
}

/// A subscription handle; drop it to unsubscribe.
pub struct AuthEventStream {
    rx: broadcast::Receiver<AuthEvent>,
}

impl AuthEventStream {
    /// The next event, or `None` once every publisher is gone.
    ///
    /// A slow consumer that falls behind skips the overwritten events and
    /// keeps going.
    pub async fn next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("auth event subscriber lagged, skipped {skipped} events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
