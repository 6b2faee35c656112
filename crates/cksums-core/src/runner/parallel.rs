//! Bounded, order-preserving fan-out of blocking work.
//!
//! Keeps up to `max_concurrent` tasks on tokio's blocking pool; when one
//! finishes the next item is started, until the input is exhausted.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Run `work` over `items` with at most `max_concurrent` in flight.
///
/// The returned vector has one slot per input item, in input order. A slot is
/// `None` only if its task panicked or was cancelled; other items are not
/// affected.
pub(crate) async fn map_bounded<I, T, R, F>(items: I, max_concurrent: usize, work: F) -> Vec<Option<R>>
where
    I: IntoIterator<Item = T>,
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    let max_concurrent = max_concurrent.max(1);
    let work = Arc::new(work);
    let mut items = items.into_iter();
    let mut slots: Vec<Option<R>> = Vec::new();
    let mut join_set = JoinSet::new();

    loop {
        while join_set.len() < max_concurrent {
            let Some(item) = items.next() else {
                break;
            };
            let index = slots.len();
            slots.push(None);
            let work = Arc::clone(&work);
            join_set.spawn_blocking(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| (*work)(item)));
                (index, result.ok())
            });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        match res {
            Ok((index, Some(value))) => slots[index] = Some(value),
            Ok((index, None)) => tracing::error!("digest task {} panicked", index),
            Err(e) => tracing::error!("digest task join: {}", e),
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn preserves_input_order_when_completion_is_reversed() {
        let items: Vec<u64> = (0..8).collect();
        let out = map_bounded(items, 8, |i| {
            std::thread::sleep(Duration::from_millis(5 * (8 - i)));
            i * 10
        })
        .await;
        let out: Vec<u64> = out.into_iter().map(Option::unwrap).collect();
        assert_eq!(out, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[tokio::test]
    async fn never_exceeds_concurrency_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (f, p) = (Arc::clone(&in_flight), Arc::clone(&peak));
        let out = map_bounded(0..20, 3, move |i| {
            let now = f.fetch_add(1, Ordering::SeqCst) + 1;
            p.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(2));
            f.fetch_sub(1, Ordering::SeqCst);
            i
        })
        .await;
        assert_eq!(out.len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn panic_in_one_task_leaves_others_intact() {
        let out = map_bounded(0..4, 2, |i: u32| {
            if i == 1 {
                panic!("boom");
            }
            i
        })
        .await;
        assert_eq!(out, vec![Some(0), None, Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn zero_concurrency_is_treated_as_one() {
        let out = map_bounded(vec!["a", "b"], 0, |s| s.len()).await;
        assert_eq!(out, vec![Some(1), Some(1)]);
    }

    #[tokio::test]
    async fn empty_input() {
        let out = map_bounded(Vec::<u8>::new(), 4, |b| b).await;
        assert!(out.is_empty());
    }
}
