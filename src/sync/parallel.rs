//! Rayon-backed bounded worker pool that preserves input order.
use std::sync::{Mutex, PoisonError};

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

/// Apply `work` to every item on at most `jobs` threads and return the
/// results in input order.
///
/// `jobs <= 1` runs sequentially on the calling thread. Results are appended
/// under a lock together with their input index and sorted afterwards, so
/// `work` runs without the lock held.
pub(super) fn map_ordered<T, R, F>(items: Vec<T>, jobs: usize, work: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    if jobs <= 1 {
        return items.into_iter().map(work).collect();
    }

    let results = Mutex::new(Vec::with_capacity(items.len()));
    let run = || {
        items.into_par_iter().enumerate().for_each(|(idx, item)| {
            let result = work(item);
            results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((idx, result));
        });
    };
    match ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool.install(run),
        Err(e) => {
            tracing::warn!("could not build a {jobs}-thread pool, using the global pool: {e}");
            run();
        }
    }

    let mut results = results
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    results.sort_unstable_by_key(|(idx, _)| *idx);
    results.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn sequential_keeps_order() {
        let out = map_ordered(vec![1, 2, 3], 1, |n| n * 10);
        assert_eq!(out, vec![10, 20, 30]);
    }

    #[test]
    fn parallel_restores_input_order() {
        // Earlier items sleep longer so they finish last.
        let items: Vec<u64> = (0..8).collect();
        let out = map_ordered(items, 4, |n| {
            std::thread::sleep(Duration::from_millis((8 - n) * 5));
            n
        });
        assert_eq!(out, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn empty_input() {
        let out: Vec<u8> = map_ordered(Vec::<u8>::new(), 4, |n| n);
        assert!(out.is_empty());
    }
}
