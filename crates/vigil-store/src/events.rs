//! Shared side channel for permission failures.
//!
//! The document backend broadcasts every permission denial here exactly
//! once, so a central listener can notify the user regardless of which
//! view triggered the failing query.

use tokio::sync::broadcast;

use crate::error::StoreOp;

/// One permission denial as observed by the document backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionEvent {
    pub operation: StoreOp,
    /// Collection path the denied operation targeted.
    pub path: String,
}

/// Broadcast channel for [`PermissionEvent`]s.
#[derive(Debug, Clone)]
pub struct ErrorChannel {
    tx: broadcast::Sender<PermissionEvent>,
}

impl ErrorChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PermissionEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no listeners is not an error.
    pub fn emit(&self, event: PermissionEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for ErrorChannel {
    fn default() -> Self {
        Self::new()
    }
}
