//! Cancellation and deadlines for long-running training

use crate::error::{ForecastError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag a caller flips to abort training from another thread
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Token plus optional deadline, checked between mini-batches
#[derive(Debug, Clone)]
pub struct TrainingGuard {
    token: CancellationToken,
    started: Instant,
    timeout: Option<Duration>,
}

impl TrainingGuard {
    /// Guard that only honours the token
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            started: Instant::now(),
            timeout: None,
        }
    }

    /// Guard that never aborts
    pub fn unbounded() -> Self {
        Self::new(CancellationToken::new())
    }

    /// Add a deadline measured from now
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.started = Instant::now();
        self.timeout = timeout;
        self
    }

    /// Fail if the token was cancelled or the deadline has passed
    pub fn check(&self, completed_epochs: usize) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(ForecastError::Cancelled { completed_epochs });
        }
        if let Some(timeout) = self.timeout {
            let elapsed = self.started.elapsed();
            if elapsed >= timeout {
                return Err(ForecastError::Timeout {
                    elapsed_ms: elapsed.as_millis(),
                });
            }
        }
        Ok(())
    }
}

impl Default for TrainingGuard {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let guard = TrainingGuard::new(token.clone());
        assert!(guard.check(0).is_ok());

        token.cancel();
        assert!(matches!(
            guard.check(3),
            Err(ForecastError::Cancelled { completed_epochs: 3 })
        ));
    }

    #[test]
    fn test_zero_timeout_expires() {
        let guard = TrainingGuard::unbounded().with_timeout(Some(Duration::ZERO));
        assert!(matches!(guard.check(0), Err(ForecastError::Timeout { .. })));
    }
}
