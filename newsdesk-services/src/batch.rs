//! Fixed-window batch processing
//!
//! The LLM batch policy: process items in fixed-size groups, awaiting each
//! group's calls concurrently, with a fixed sleep between groups. One item's
//! failure never blocks or fails the rest of the batch; the caller receives
//! every item's result.

use std::future::Future;
use std::time::Duration;

/// Run `f` over `items` in groups of `batch_size`, sleeping `delay` between
/// groups. Results are returned in item order once every item has settled.
pub async fn process_in_batches<T, R, F, Fut>(
    items: Vec<T>,
    batch_size: usize,
    delay: Duration,
    mut f: F,
) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    let batch_size = batch_size.max(1);
    let mut results = Vec::with_capacity(items.len());
    let mut iter = items.into_iter().peekable();

    while iter.peek().is_some() {
        let group: Vec<T> = iter.by_ref().take(batch_size).collect();
        let futures: Vec<Fut> = group.into_iter().map(&mut f).collect();
        results.extend(futures::future::join_all(futures).await);

        if iter.peek().is_some() {
            tokio::time::sleep(delay).await;
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::time::Instant;

    use super::*;

    #[tokio::test]
    async fn test_groups_and_delays() {
        let started = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();

        let results = process_in_batches(
            (0..12).collect::<Vec<usize>>(),
            5,
            Duration::from_millis(50),
            |i| {
                let started = Arc::clone(&started);
                async move {
                    started.lock().unwrap().push((i, start.elapsed()));
                    i * 2
                }
            },
        )
        .await;

        assert_eq!(results.len(), 12);
        assert_eq!(results[3], 6);

        let started = started.lock().unwrap();
        assert_eq!(started.len(), 12);

        // 12 items at batch size 5 run as three groups (5, 5, 2), so the
        // last item starts after two inter-group delays
        let first_start = started[0].1;
        let sixth_start = started.iter().find(|(i, _)| *i == 5).unwrap().1;
        let last_start = started.iter().find(|(i, _)| *i == 11).unwrap().1;

        assert!((sixth_start - first_start).as_millis() >= 40);
        assert!((last_start - first_start).as_millis() >= 90);
    }

    #[tokio::test]
    async fn test_single_failure_does_not_block_others() {
        let results = process_in_batches(
            (0..12).collect::<Vec<usize>>(),
            5,
            Duration::from_millis(1),
            |i| async move {
                if i == 7 {
                    Err(format!("item {} failed", i))
                } else {
                    Ok(i)
                }
            },
        )
        .await;

        let ok = results.iter().filter(|r| r.is_ok()).count();
        let failed = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(ok, 11);
        assert_eq!(failed, 1);
        assert!(results[7].is_err());
        assert_eq!(results[8], Ok(8));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results: Vec<i32> =
            process_in_batches(Vec::<i32>::new(), 5, Duration::ZERO, |i| async move { i }).await;
        assert!(results.is_empty());
    }
}
