//! Graceful shutdown signal shared by the server and the signal listener.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// Cloneable shutdown handle.
///
/// Every clone observes the same signal. Waiting on a handle after the signal
/// was raised returns immediately.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
    raised: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            raised: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Raise the signal. Later calls are no-ops.
    pub fn trigger(&self) {
        if self.raised.swap(true, Ordering::SeqCst) {
            return;
        }
        let waiting = self.tx.send(()).unwrap_or(0);
        tracing::debug!(waiting, "Shutdown raised");
    }

    pub fn is_triggered(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Resolve once [`trigger`](Self::trigger) has been called.
    pub fn notified(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        let raised = self.raised.clone();
        async move {
            if raised.load(Ordering::SeqCst) {
                return;
            }
            let _ = rx.recv().await;
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
