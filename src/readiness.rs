//! Bounded readiness gate.
//!
//! Script injection gives no load-completion signal, so the only wait
//! strategy is polling. The gate polls at a fixed cadence, bounds the
//! whole wait with a timeout, and reports exhaustion as a typed error;
//! cancellation falls out of dropping the future.

use crate::error::BindError;
use crate::page::PageSurface;
use std::time::Duration;
use tracing::{debug, warn};

/// Default poll cadence.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);
/// Default bound on the whole wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Polls a page at a fixed cadence until masking is callable.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    interval: Duration,
    timeout: Duration,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL, DEFAULT_TIMEOUT)
    }
}

impl ReadinessGate {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Probe `page.mask_ready()` until it reports ready, sleeping the
    /// configured interval between probes. Returns the number of probes on
    /// success; [`BindError::ReadinessTimeout`] once the next sleep would
    /// cross the timeout.
    pub async fn wait_ready<S: PageSurface + ?Sized>(
        &self,
        page: &mut S,
    ) -> Result<u32, BindError> {
        let start = tokio::time::Instant::now();
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            if page.mask_ready().await? {
                debug!(attempts, "masking ready");
                return Ok(attempts);
            }
            if start.elapsed() + self.interval > self.timeout {
                warn!(attempts, elapsed = ?start.elapsed(), "readiness wait exhausted");
                return Err(BindError::ReadinessTimeout {
                    attempts,
                    elapsed: start.elapsed(),
                });
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::memory::MemoryPage;

    #[tokio::test(start_paused = true)]
    async fn test_ready_immediately_takes_one_probe() {
        let mut page = MemoryPage::from_html("<html></html>");
        let gate = ReadinessGate::default();
        assert_eq!(gate.wait_ready(&mut page).await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_readiness_retries_until_ready() {
        let mut page = MemoryPage::from_html("<html></html>").with_ready_after(3);
        let gate = ReadinessGate::default();
        let attempts = gate.wait_ready(&mut page).await.unwrap();
        assert_eq!(attempts, 4);
        assert!(attempts > 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_surfaces_as_typed_error() {
        let mut page = MemoryPage::from_html("<html></html>").with_ready_after(u32::MAX);
        let gate = ReadinessGate::new(Duration::from_millis(50), Duration::from_millis(200));
        let err = gate.wait_ready(&mut page).await.unwrap_err();
        match err {
            BindError::ReadinessTimeout { attempts, .. } => assert!(attempts >= 4),
            other => panic!("unexpected error: {other}"),
        }
    }
}
