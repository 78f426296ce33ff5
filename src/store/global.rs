//! Transient UI message (last server error)

use tokio::sync::watch;

/// Holds a single message string and notifies subscribers when it changes.
///
/// Cloning shares the same underlying message.
#[derive(Clone)]
pub struct GlobalStore {
    tx: watch::Sender<String>,
}

impl GlobalStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self { tx }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("UI message: {}", message);
        self.tx.send_replace(message);
    }

    pub fn message(&self) -> String {
        self.tx.borrow().clone()
    }

    pub fn clear(&self) {
        self.tx.send_replace(String::new());
    }

    /// Receiver that wakes on every `set_message`/`clear`.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for GlobalStore {
    fn default() -> Self {
        Self::new()
    }
}
