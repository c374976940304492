//! Process-wide cancellation signal for in-flight bundle polling.

use tokio::sync::watch;

/// Fires a [`Cancellation`] once, typically on graceful shutdown.
#[derive(Debug)]
pub struct CancellationHandle {
    tx: watch::Sender<bool>,
}

impl CancellationHandle {
    /// Signal every [`Cancellation`] created from this handle.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes a [`CancellationHandle`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: Option<watch::Receiver<bool>>,
}

impl Cancellation {
    /// Create a connected handle / signal pair.
    #[must_use]
    pub fn new() -> (CancellationHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (CancellationHandle { tx }, Self { rx: Some(rx) })
    }

    /// A signal that never fires.
    #[must_use]
    pub const fn never() -> Self {
        Self { rx: None }
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once cancellation has been requested.
    ///
    /// Pends forever if the handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        if let Some(rx) = &self.rx {
            let mut rx = rx.clone();
            if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_cancel_wakes_waiters() {
        let (handle, cancellation) = Cancellation::new();
        let waiter = tokio::spawn({
            let cancellation = cancellation.clone();
            async move { cancellation.cancelled().await }
        });

        assert!(!cancellation.is_cancelled());
        handle.cancel();
        assert!(cancellation.is_cancelled());
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter should not panic");
    }

    #[tokio::test]
    async fn test_already_cancelled_resolves_immediately() {
        let (handle, cancellation) = Cancellation::new();
        handle.cancel();
        tokio::time::timeout(Duration::from_millis(10), cancellation.cancelled())
            .await
            .expect("should resolve immediately");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_never_fires() {
        let (handle, cancellation) = Cancellation::new();
        drop(handle);
        let result = tokio::time::timeout(Duration::from_secs(60), cancellation.cancelled()).await;
        assert!(result.is_err());
        assert!(!cancellation.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_does_not_fire() {
        let cancellation = Cancellation::never();
        let result = tokio::time::timeout(Duration::from_secs(60), cancellation.cancelled()).await;
        assert!(result.is_err());
    }
}
