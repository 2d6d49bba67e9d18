//! Shutdown coordination.

use tokio_util::sync::CancellationToken;

/// Coordinator for graceful shutdown.
///
/// Clones share one token; every long-running task watches it.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that is cancelled once shutdown starts.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger the shutdown signal. Idempotent.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Resolve once shutdown has been triggered.
    pub async fn triggered(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_is_seen_by_clones() {
        let shutdown = Shutdown::new();
        let observer = shutdown.clone();
        assert!(!observer.token().is_cancelled());

        shutdown.trigger();
        shutdown.trigger();
        observer.triggered().await;
        assert!(observer.token().is_cancelled());
    }
}
