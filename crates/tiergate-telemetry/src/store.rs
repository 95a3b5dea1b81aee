// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, append-only log of query outcomes.
//!
//! The store is the one shared mutable resource in Tiergate. Appends and their
//! evictions happen under a single mutex; readers copy the contents out and
//! analyze the copy, so reports never hold the lock while computing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tiergate_config::model::TelemetryConfig;
use tiergate_core::TiergateError;
use tracing::debug;

use crate::aggregate::{aggregate, AggregatedMetrics};
use crate::forecast::{forecast, CostForecast};
use crate::metric::{QueryMetric, TimeRange};
use crate::recommend::{recommend, Recommendation};
use crate::recording;

/// FIFO ring of [`QueryMetric`]s holding at most `capacity` entries.
#[derive(Debug)]
pub struct TelemetryStore {
    entries: Mutex<VecDeque<QueryMetric>>,
    capacity: usize,
    appended: AtomicU64,
}

impl TelemetryStore {
    /// Create an empty store. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(4096))),
            capacity,
            appended: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.max_history)
    }

    // Entries are only ever pushed whole, so a poisoned lock still guards a
    // consistent deque.
    fn lock(&self) -> MutexGuard<'_, VecDeque<QueryMetric>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a metric, evicting the oldest entry once capacity is exceeded.
    pub fn append(&self, metric: QueryMetric) {
        let evicted = {
            let mut entries = self.lock();
            entries.push_back(metric);
            if entries.len() > self.capacity {
                entries.pop_front()
            } else {
                None
            }
        };
        let total = self.appended.fetch_add(1, Ordering::Relaxed) + 1;

        if let Some(old) = evicted {
            debug!(
                backend = %old.backend,
                timestamp = %old.timestamp,
                capacity = self.capacity,
                "evicted oldest query metric"
            );
            recording::record_eviction();
        }
        debug!(total, "appended query metric");
    }

    /// Metrics whose timestamp falls inside `range`, in insertion order.
    pub fn query(&self, range: TimeRange) -> Vec<QueryMetric> {
        self.lock()
            .iter()
            .filter(|m| range.contains(m.timestamp))
            .cloned()
            .collect()
    }

    /// Copy of every retained metric, oldest first.
    pub fn snapshot(&self) -> Vec<QueryMetric> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of metrics ever appended, including evicted ones.
    pub fn total_appended(&self) -> u64 {
        self.appended.load(Ordering::Relaxed)
    }

    /// Aggregate the metrics inside `range`.
    pub fn aggregate(&self, range: TimeRange) -> AggregatedMetrics {
        aggregate(&self.query(range))
    }

    /// Recommendations over the full retained history.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        recommend(&self.snapshot())
    }

    /// Cost forecast over `days` from the most recent history.
    pub fn forecast(&self, days: u32) -> Result<CostForecast, TiergateError> {
        forecast(&self.snapshot(), days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::metric;
    use proptest::prelude::*;
    use std::sync::Arc;
    use tiergate_core::{Backend, Complexity};

    #[test]
    fn retains_at_most_capacity() {
        let store = TelemetryStore::new(3);
        for i in 0..3 {
            store.append(metric(Backend::ApiEconomy, Complexity::Simple, i));
        }
        assert_eq!(store.len(), 3);

        store.append(metric(Backend::ApiEconomy, Complexity::Simple, 3));
        assert_eq!(store.len(), 3);
        assert_eq!(store.total_appended(), 4);
    }

    #[test]
    fn oldest_retained_is_first_survivor() {
        let capacity = 5;
        let n = 12;
        let store = TelemetryStore::new(capacity);
        for i in 0..n {
            store.append(metric(Backend::ApiBalanced, Complexity::Moderate, i));
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), capacity);
        // The (n - capacity + 1)-th inserted has zero-based index n - capacity.
        assert_eq!(snapshot[0].question, format!("question {}", n - capacity as i64));
        assert_eq!(snapshot[capacity - 1].question, format!("question {}", n - 1));
    }

    proptest! {
        #[test]
        fn overflow_keeps_newest_capacity_entries(capacity in 1usize..40, extra in 1usize..60) {
            let n = capacity + extra;
            let store = TelemetryStore::new(capacity);
            for i in 0..n {
                store.append(metric(Backend::ApiEconomy, Complexity::Simple, i as i64));
            }
            let snapshot = store.snapshot();
            prop_assert_eq!(snapshot.len(), capacity);
            prop_assert_eq!(&snapshot[0].question, &format!("question {}", n - capacity));
            prop_assert_eq!(&snapshot[capacity - 1].question, &format!("question {}", n - 1));
            prop_assert_eq!(store.total_appended(), n as u64);
        }
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let store = TelemetryStore::new(0);
        assert_eq!(store.capacity(), 1);
        store.append(metric(Backend::ApiEconomy, Complexity::Simple, 0));
        store.append(metric(Backend::ApiEconomy, Complexity::Simple, 1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].question, "question 1");
    }

    #[test]
    fn query_filters_inclusively_in_order() {
        let store = TelemetryStore::new(10);
        for i in 0..5 {
            store.append(metric(Backend::ApiEconomy, Complexity::Simple, i * 60));
        }
        let all = store.snapshot();
        let window = store.query(TimeRange::between(all[1].timestamp, all[3].timestamp));
        let questions: Vec<_> = window.iter().map(|m| m.question.as_str()).collect();
        assert_eq!(questions, ["question 60", "question 120", "question 180"]);
        assert_eq!(store.query(TimeRange::all()).len(), 5);
    }

    #[test]
    fn concurrent_appends_respect_bound() {
        let store = Arc::new(TelemetryStore::new(50));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let m = metric(Backend::SelfHosted, Complexity::Complex, t * 1000 + i);
                        store.append(m);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 50);
        assert_eq!(store.total_appended(), 800);
    }

    #[test]
    fn empty_store_reports_empty() {
        let store = TelemetryStore::from_config(&TelemetryConfig::default());
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 10_000);
        assert_eq!(store.aggregate(TimeRange::all()).total_queries, 0);
    }
}
