//! Per-series sample cache
//!
//! Each logical series owns one [`SeriesCache`] holding the (x, y) pairs
//! that have not yet been confirmed sent to the backend. The facade
//! clears a cache only after a successful dispatch, so transient send
//! failures accumulate a backlog that the next successful send flushes
//! in one batch.

use crate::config::CachePolicy;
use crate::error::{Result, VizStreamError};
use crate::types::Sample;
use std::collections::VecDeque;

/// Ordered buffer of pending samples for one series
#[derive(Debug)]
pub struct SeriesCache {
    /// Series identifier, used for logging and error reporting
    series: String,
    /// Pending samples in arrival order
    samples: VecDeque<Sample>,
    /// Capacity policy applied on update
    policy: CachePolicy,
    /// Samples discarded under the drop-oldest policy
    dropped: u64,
}

impl SeriesCache {
    /// Create an empty cache for the given series
    pub fn new(series: impl Into<String>, policy: CachePolicy) -> Self {
        Self {
            series: series.into(),
            samples: VecDeque::new(),
            policy,
            dropped: 0,
        }
    }

    /// Append a sample, honoring the capacity policy
    pub fn update(&mut self, sample: Sample) -> Result<()> {
        match self.policy {
            CachePolicy::Unbounded => {}
            CachePolicy::FailFast(limit) => {
                if self.samples.len() >= limit {
                    return Err(VizStreamError::CacheFull {
                        series: self.series.clone(),
                        capacity: limit,
                    });
                }
            }
            CachePolicy::DropOldest(limit) => {
                while self.samples.len() >= limit.max(1) {
                    self.samples.pop_front();
                    self.dropped += 1;
                    tracing::warn!(
                        series = %self.series,
                        dropped = self.dropped,
                        "cache full, discarding oldest pending sample"
                    );
                }
            }
        }

        self.samples.push_back(sample);
        Ok(())
    }

    /// Accumulated x and y sequences as parallel ordered vectors
    pub fn snapshot(&self) -> (Vec<f64>, Vec<f64>) {
        let xs = self.samples.iter().map(|s| s.x).collect();
        let ys = self.samples.iter().map(|s| s.y).collect();
        (xs, ys)
    }

    /// Discard all pending samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of pending samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the cache holds no pending samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total samples discarded under the drop-oldest policy
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(cache: &mut SeriesCache, n: usize) {
        for i in 0..n {
            cache.update(Sample::new(i as f64, (i * 10) as f64)).unwrap();
        }
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut cache = SeriesCache::new("loss_train", CachePolicy::Unbounded);
        fill(&mut cache, 4);

        let (xs, ys) = cache.snapshot();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(ys, vec![0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_clear_resets_cache() {
        let mut cache = SeriesCache::new("loss_train", CachePolicy::Unbounded);
        fill(&mut cache, 3);
        assert_eq!(cache.len(), 3);

        cache.clear();
        assert!(cache.is_empty());

        let (xs, ys) = cache.snapshot();
        assert!(xs.is_empty());
        assert!(ys.is_empty());
    }

    #[test]
    fn test_fail_fast_rejects_at_capacity() {
        let mut cache = SeriesCache::new("loss_train", CachePolicy::FailFast(2));
        fill(&mut cache, 2);

        let err = cache.update(Sample::new(2.0, 20.0)).unwrap_err();
        match err {
            VizStreamError::CacheFull { series, capacity } => {
                assert_eq!(series, "loss_train");
                assert_eq!(capacity, 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Existing samples are untouched
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_drop_oldest_keeps_newest() {
        let mut cache = SeriesCache::new("loss_train", CachePolicy::DropOldest(3));
        fill(&mut cache, 5);

        let (xs, _) = cache.snapshot();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
        assert_eq!(cache.dropped(), 2);
    }

    #[test]
    fn test_unbounded_growth() {
        let mut cache = SeriesCache::new("loss_train", CachePolicy::Unbounded);
        fill(&mut cache, 10_000);
        assert_eq!(cache.len(), 10_000);
        assert_eq!(cache.dropped(), 0);
    }
}
