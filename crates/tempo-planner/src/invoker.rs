//! Bounded concurrent invoker with exponential-backoff retry.
//!
//! Runs many independent judgment-service calls under a single counting
//! admission gate so in-flight oracle requests never exceed the configured
//! cap. Transient errors (as judged by an injected classifier) are retried
//! with `base_delay * 2^attempt` backoff; everything else fails fast.
//!
//! The gate is constructed once per planner run and shared across all
//! chunks - it protects a real external rate limit, so it must not be
//! per-chunk state.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Marker for an invocation refused because the invoker was cancelled.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

/// Retry behavior for transient failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Base delay for exponential backoff (doubles each attempt).
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after the given zero-based attempt.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Bounded concurrent invoker for independent oracle calls.
pub struct Invoker {
    gate: Arc<Semaphore>,
    retry: RetryPolicy,
}

impl Invoker {
    /// Create an invoker with the given concurrency cap and retry policy.
    pub fn new(max_concurrency: usize, retry: RetryPolicy) -> Self {
        Self {
            gate: Arc::new(Semaphore::new(max_concurrency.max(1))),
            retry,
        }
    }

    /// Cancel the invoker: outstanding items that have not yet acquired the
    /// gate will not start. Already-dispatched calls run to completion per
    /// the oracle's own timeout.
    pub fn cancel(&self) {
        self.gate.close();
    }

    /// Run one operation under the admission gate with retry.
    ///
    /// `is_transient` classifies errors worth retrying; the permit is
    /// released during the backoff sleep so other items can proceed.
    pub async fn invoke<T, E, F, Fut>(
        &self,
        operation: F,
        is_transient: &(impl Fn(&E) -> bool + Sync),
    ) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<Cancelled> + std::fmt::Display,
    {
        let mut attempt = 0u32;
        loop {
            let permit = match self.gate.acquire().await {
                Ok(permit) => permit,
                Err(_) => return Err(Cancelled.into()),
            };
            let result = operation().await;
            drop(permit);

            match result {
                Ok(value) => return Ok(value),
                Err(e) if is_transient(&e) && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    attempt += 1;
                    warn!(
                        "transient judgment failure (attempt {}/{}), retrying in {:?}: {}",
                        attempt, self.retry.max_retries, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run all items concurrently and collect results keyed by item key.
    ///
    /// Completion order is unspecified; callers re-associate results via the
    /// key, never positionally. The first error (after per-item retries)
    /// is propagated once all in-flight items have settled.
    pub async fn run_all<K, T, E, F, Fut>(
        &self,
        items: Vec<(K, F)>,
        is_transient: impl Fn(&E) -> bool + Sync,
    ) -> Result<HashMap<K, T>, E>
    where
        K: Eq + Hash,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<Cancelled> + std::fmt::Display,
    {
        debug!("dispatching {} judgment calls", items.len());
        let is_transient = &is_transient;
        let futures = items.into_iter().map(|(key, operation)| async move {
            self.invoke(operation, is_transient).await.map(|v| (key, v))
        });

        join_all(futures).await.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    #[derive(Debug)]
    enum TestError {
        RateLimited,
        Fatal,
        Cancelled,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl From<Cancelled> for TestError {
        fn from(_: Cancelled) -> Self {
            TestError::Cancelled
        }
    }

    fn transient(e: &TestError) -> bool {
        matches!(e, TestError::RateLimited)
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_error_with_backoff() {
        let invoker = Invoker::new(2, RetryPolicy::default());
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = invoker
            .invoke(
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n < 2 {
                            Err(TestError::RateLimited)
                        } else {
                            Ok(42)
                        }
                    }
                },
                &transient,
            )
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two failures: backoff of 1s then 2s on the paused clock.
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_fatal_error_fails_fast() {
        let invoker = Invoker::new(2, RetryPolicy::default());
        let calls = AtomicU32::new(0);

        let result: Result<u32, _> = invoker
            .invoke(
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(TestError::Fatal) }
                },
                &transient,
            )
            .await;

        assert!(matches!(result, Err(TestError::Fatal)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_error_exhausts_retries() {
        let invoker = Invoker::new(
            2,
            RetryPolicy {
                max_retries: 3,
                base_delay: Duration::from_secs(1),
            },
        );
        let calls = AtomicU32::new(0);

        let result: Result<u32, _> = invoker
            .invoke(
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(TestError::RateLimited) }
                },
                &transient,
            )
            .await;

        assert!(matches!(result, Err(TestError::RateLimited)));
        // Initial attempt plus three retries.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_concurrency_cap_is_observed() {
        let invoker = Invoker::new(2, RetryPolicy::default());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let items: Vec<(usize, _)> = (0..8)
            .map(|i| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                (i, move || {
                    let in_flight = in_flight.clone();
                    let peak = peak.clone();
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, TestError>(i * 2)
                    }
                })
            })
            .collect();

        let results = invoker.run_all(items, transient).await.unwrap();

        assert_eq!(results.len(), 8);
        assert_eq!(results[&3], 6);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_cancel_prevents_new_invocations() {
        let invoker = Invoker::new(1, RetryPolicy::default());
        invoker.cancel();

        let result: Result<u32, TestError> =
            invoker.invoke(|| async { Ok(1) }, &transient).await;

        assert!(matches!(result, Err(TestError::Cancelled)));
    }
}
