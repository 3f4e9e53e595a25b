//! Cancellation handlers
//!
//! `ShutdownToken` is a `watch`-backed flag. The terminal wires it to Ctrl-C
//! and SIGTERM; tests flip it by hand.

use async_trait::async_trait;
use grouptrack_core::effects::CancellationToken;
use std::sync::Arc;
use tokio::sync::watch;

/// Cooperative cancellation flag shared between the signal listener and a run.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownToken {
    /// Create a token that has not fired
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Spawn a task that cancels this token on Ctrl-C or SIGTERM.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn listen_for_signals(&self) {
        let token = self.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            tracing::warn!("Interrupt received, cancelling run");
            token.cancel();
        });
    }
}

#[async_trait]
impl CancellationToken for ShutdownToken {
    async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        let fired = receiver.wait_for(|fired| *fired).await.is_ok();
        // A closed channel can never fire; park forever like NeverCancel
        if !fired {
            std::future::pending::<()>().await;
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grouptrack_core::effects::guarded;
    use grouptrack_core::TrackerError;

    #[tokio::test]
    async fn test_cancel_is_observed() {
        let token = ShutdownToken::new();
        assert!(!token.is_cancelled());

        let clone = token.clone();
        clone.cancel();

        assert!(token.is_cancelled());
        token.cancelled().await;
    }

    #[tokio::test]
    async fn test_guarded_short_circuits_after_cancel() {
        let token = ShutdownToken::new();
        token.cancel();

        let result = guarded(&token, async { Ok::<_, TrackerError>(1) }).await;
        assert_eq!(result, Err(TrackerError::Cancelled));
    }

    #[tokio::test]
    async fn test_guarded_interrupts_pending_work() {
        let token = ShutdownToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            trigger.cancel();
        });

        let result: Result<(), TrackerError> = guarded(&token, async {
            std::future::pending::<()>().await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(TrackerError::Cancelled));
    }
}
