//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinator for stopping a group of long-running tasks.
///
/// Each probe generation holds one of these; tasks subscribe and finish
/// their current round when the signal fires, so no snapshot write is
/// interrupted mid-flight.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
