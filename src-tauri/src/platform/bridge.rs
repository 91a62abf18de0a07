//! Request/reply rendezvous with the webview.
//!
//! Some surfaces (camera, the Android runtime permission prompt) are shown
//! by the frontend. Rust opens a slot, emits an event carrying the request
//! id, and the frontend answers through a command that completes the slot.

use std::sync::Mutex;

use tokio::sync::oneshot;

use super::Failure;

/// Single pending request; a second request while one is outstanding fails
/// instead of queueing.
pub struct ReplySlot<T> {
    kind: &'static str,
    pending: Mutex<Option<(String, oneshot::Sender<T>)>>,
}

impl<T> ReplySlot<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            pending: Mutex::new(None),
        }
    }

    /// Open the slot; returns the request id and the reply receiver
    pub fn begin(&self) -> Result<(String, oneshot::Receiver<T>), Failure> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| Failure::Other(format!("Failed to lock {} slot", self.kind)))?;

        if let Some((_, sender)) = pending.as_ref() {
            if !sender.is_closed() {
                return Err(Failure::Unavailable(format!("{} already in progress", self.kind)));
            }
        }

        let request_id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        *pending = Some((request_id.clone(), tx));
        Ok((request_id, rx))
    }

    /// Deliver the frontend's answer; false if no matching request is pending
    pub fn complete(&self, request_id: &str, reply: T) -> bool {
        let Ok(mut pending) = self.pending.lock() else {
            return false;
        };

        match pending.take() {
            Some((id, sender)) if id == request_id => sender.send(reply).is_ok(),
            other => {
                tracing::warn!("{} reply for unknown request {}", self.kind, request_id);
                *pending = other;
                false
            }
        }
    }

    /// Wait on a receiver from [`ReplySlot::begin`]; `None` if the slot was
    /// dropped without an answer
    pub async fn wait(rx: oneshot::Receiver<T>) -> Option<T> {
        rx.await.ok()
    }
}
