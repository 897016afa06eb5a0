//! Scraping rate limits
//!
//! Outbound scraping traffic is shaped three ways: a randomized delay so
//! requests don't look machine-timed, a bounded-concurrency task runner, and
//! a per-domain limiter that guarantees minimum spacing between requests to
//! the same host.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Default randomized delay window for scraping requests
pub const DEFAULT_DELAY_MIN_MS: u64 = 1000;
pub const DEFAULT_DELAY_MAX_MS: u64 = 3000;

/// Default minimum spacing between requests to the same host
pub const DEFAULT_DOMAIN_INTERVAL_MS: u64 = 1000;

/// Sleep for a uniformly random duration within [min_ms, max_ms].
pub async fn random_delay(min_ms: u64, max_ms: u64) {
    let delay = {
        let mut rng = rand::rng();
        rng.random_range(min_ms..=max_ms.max(min_ms))
    };
    tokio::time::sleep(Duration::from_millis(delay)).await;
}

/// Run tasks with bounded concurrency, inserting the randomized delay before
/// each task's execution.
///
/// At most `limit` tasks are in flight at once. Results come back in task
/// order once every task has settled; per-task errors are returned as-is,
/// never swallowed here.
pub async fn run_with_limit<T, E, F, Fut>(tasks: Vec<F>, limit: usize) -> Vec<Result<T, E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    run_with_limit_and_delay(tasks, limit, DEFAULT_DELAY_MIN_MS, DEFAULT_DELAY_MAX_MS).await
}

/// [`run_with_limit`] with an explicit delay window.
pub async fn run_with_limit_and_delay<T, E, F, Fut>(
    tasks: Vec<F>,
    limit: usize,
    delay_min_ms: u64,
    delay_max_ms: u64,
) -> Vec<Result<T, E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    stream::iter(tasks)
        .map(|task| async move {
            random_delay(delay_min_ms, delay_max_ms).await;
            task().await
        })
        .buffered(limit.max(1))
        .collect()
        .await
}

/// Per-domain limiter enforcing minimum spacing between requests to one host.
///
/// Callers reserve a time slot while holding the lock, so concurrent callers
/// for the same host cannot observe the same timestamp and fire together.
pub struct DomainRateLimiter {
    /// Next available slot per host
    next_slot: Mutex<HashMap<String, Instant>>,
    min_interval: Duration,
}

impl DomainRateLimiter {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            next_slot: Mutex::new(HashMap::new()),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait until a request to `domain` is allowed.
    pub async fn wait_for(&self, domain: &str) {
        let slot = {
            let mut slots = self.next_slot.lock().await;
            let now = Instant::now();

            let slot = match slots.get(domain) {
                Some(&next) if next > now => next,
                _ => now,
            };
            slots.insert(domain.to_string(), slot + self.min_interval);
            slot
            // Lock released here; we sleep outside of it
        };

        let wait = slot.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            debug!("Domain {} throttled for {:?}", domain, wait);
            tokio::time::sleep_until(slot).await;
        }
    }

    /// Wait keyed on the host of `url`; URLs without a host pass through.
    pub async fn wait_for_url(&self, url: &str) {
        if let Some(host) = url::Url::parse(url).ok().and_then(|u| u.host_str().map(String::from)) {
            self.wait_for(&host).await;
        }
    }
}

impl Default for DomainRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_request_immediate() {
        let limiter = DomainRateLimiter::new(100);

        let start = Instant::now();
        limiter.wait_for("example.com").await;
        let elapsed = start.elapsed();

        assert!(elapsed.as_millis() < 20, "First request took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_second_request_waits() {
        let limiter = DomainRateLimiter::new(100);

        limiter.wait_for("example.com").await;

        let start = Instant::now();
        limiter.wait_for("example.com").await;
        let elapsed = start.elapsed();

        assert!(
            elapsed.as_millis() >= 90,
            "Should have waited at least 90ms, waited {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_different_domains_are_independent() {
        let limiter = DomainRateLimiter::new(200);

        limiter.wait_for("a.com").await;

        let start = Instant::now();
        limiter.wait_for("b.com").await;
        let elapsed = start.elapsed();

        assert!(elapsed.as_millis() < 20, "Other domain waited {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_spaced() {
        let limiter = Arc::new(DomainRateLimiter::new(50));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.wait_for("example.com").await;
                start.elapsed()
            }));
        }

        let mut times: Vec<Duration> = Vec::new();
        for handle in handles {
            times.push(handle.await.unwrap());
        }
        times.sort();

        for window in times.windows(2) {
            let gap = window[1] - window[0];
            assert!(
                gap.as_millis() >= 40,
                "Gap was only {:?}, expected >= 40ms",
                gap
            );
        }
    }

    #[tokio::test]
    async fn test_run_with_limit_bounds_concurrency() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                move || async move {
                    let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(current, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<usize, std::io::Error>(i)
                }
            })
            .collect();

        let results = run_with_limit_and_delay(tasks, 3, 0, 1).await;

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.is_ok()));
        assert!(
            peak.load(Ordering::SeqCst) <= 3,
            "Peak concurrency was {}",
            peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn test_run_with_limit_keeps_task_errors() {
        let tasks: Vec<_> = (0..3)
            .map(|i| {
                move || async move {
                    if i == 1 {
                        Err(std::io::Error::other("boom"))
                    } else {
                        Ok(i)
                    }
                }
            })
            .collect();

        let results = run_with_limit_and_delay(tasks, 2, 0, 1).await;

        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
