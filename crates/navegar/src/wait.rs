//! Wait mechanisms for synchronization.
//!
//! Every interaction and assertion in this crate is a suspension point: the
//! calling test awaits until the engine reports the condition or a timeout
//! elapses. Polling sleeps on the tokio timer between probes; nothing
//! busy-waits.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::result::{NavegarError, NavegarResult};

/// Default timeout for navigation-level waits (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Poll an async probe until it reports `true` or the timeout elapses.
///
/// The probe runs once immediately, then at each poll interval. A probe
/// error aborts the wait and propagates unmodified.
///
/// # Errors
///
/// Returns [`NavegarError::Timeout`] if the deadline passes, or the probe's
/// own error.
pub async fn poll_until<F, Fut>(options: &WaitOptions, mut probe: F) -> NavegarResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = NavegarResult<bool>>,
{
    let deadline = Instant::now() + options.timeout();
    loop {
        if probe().await? {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(NavegarError::Timeout {
                ms: options.timeout_ms,
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_default_options() {
        let options = WaitOptions::default();
        assert_eq!(options.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
        assert_eq!(options.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_builder() {
        let options = WaitOptions::new().with_timeout(250).with_poll_interval(10);
        assert_eq!(options.timeout(), Duration::from_millis(250));
        assert_eq!(options.poll_interval(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_poll_until_immediate_success() {
        let options = WaitOptions::new().with_timeout(100).with_poll_interval(10);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_ref = calls.clone();

        poll_until(&options, || {
            let calls = calls_ref.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_poll_until_eventual_success() {
        let options = WaitOptions::new().with_timeout(1000).with_poll_interval(5);
        let calls = Arc::new(AtomicU32::new(0));
        let calls_ref = calls.clone();

        poll_until(&options, || {
            let calls = calls_ref.clone();
            async move { Ok(calls.fetch_add(1, Ordering::SeqCst) >= 3) }
        })
        .await
        .unwrap();

        assert!(calls.load(Ordering::SeqCst) >= 4);
    }

    #[tokio::test]
    async fn test_poll_until_times_out() {
        let options = WaitOptions::new().with_timeout(50).with_poll_interval(5);
        let started = Instant::now();

        let result = poll_until(&options, || async { Ok(false) }).await;

        assert!(matches!(result, Err(NavegarError::Timeout { ms: 50 })));
        // Bounded: well under the 30s default, just past the 50ms deadline
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_probe_error_propagates() {
        let options = WaitOptions::new().with_timeout(100).with_poll_interval(5);

        let result = poll_until(&options, || async {
            Err(NavegarError::PageError {
                message: "gone".to_string(),
            })
        })
        .await;

        assert!(matches!(result, Err(NavegarError::PageError { .. })));
    }
}
