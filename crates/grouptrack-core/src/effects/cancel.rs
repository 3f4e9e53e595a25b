//! Cooperative cancellation.
//!
//! A token is threaded explicitly through every remote call and every sleep.
//! The core never installs a signal handler itself.

use crate::errors::{Result, TrackerError};
use async_trait::async_trait;
use std::future::Future;

/// Cooperative cancellation token.
#[async_trait]
pub trait CancellationToken: Send + Sync {
    /// Resolves when cancellation is requested.
    async fn cancelled(&self);

    /// Non-blocking cancellation check.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Cancellation token that never triggers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

#[async_trait]
impl CancellationToken for NeverCancel {
    async fn cancelled(&self) {
        std::future::pending::<()>().await;
    }
}

/// Run `fut` unless `token` fires first.
///
/// A token that is already cancelled short-circuits without polling `fut`.
pub async fn guarded<T, F>(token: &dyn CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if token.is_cancelled() {
        return Err(TrackerError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(TrackerError::Cancelled),
        result = fut => result,
    }
}
