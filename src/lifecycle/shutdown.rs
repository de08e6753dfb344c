//! Shutdown coordination for the service.

use tokio::sync::broadcast;

/// Broadcast-based shutdown coordinator.
///
/// The server and any background task subscribe; one `trigger` stops them all.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        tracing::info!(subscribers = self.tx.receiver_count(), "Shutdown triggered");
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves once the coordinator fires or every sender is gone.
pub async fn wait_for(mut rx: broadcast::Receiver<()>) {
    // Lagged and Closed both mean shutdown should proceed
    let _ = rx.recv().await;
}
