// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Windowed statistics over query metrics.

use std::collections::BTreeMap;

use serde::Serialize;
use tiergate_core::{Backend, Complexity, Sensitivity};

use crate::metric::QueryMetric;

/// Summary of a window of query metrics. All fields are zero for an empty window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedMetrics {
    pub total_queries: usize,
    pub successful_queries: usize,
    pub failed_queries: usize,
    /// Successful / total, 0.0 for an empty window.
    pub success_rate: f64,
    /// Summed estimated cost in USD.
    pub total_cost: f64,
    pub avg_latency_ms: f64,
    pub avg_iterations: f64,
    pub queries_by_backend: BTreeMap<Backend, usize>,
    pub queries_by_complexity: BTreeMap<Complexity, usize>,
    pub queries_by_sensitivity: BTreeMap<Sensitivity, usize>,
}

/// Compute totals, means and grouped counts for `metrics`.
pub fn aggregate(metrics: &[QueryMetric]) -> AggregatedMetrics {
    if metrics.is_empty() {
        return AggregatedMetrics::default();
    }

    let mut agg = AggregatedMetrics {
        total_queries: metrics.len(),
        ..Default::default()
    };
    let mut latency_sum = 0.0;
    let mut iteration_sum = 0u64;

    for m in metrics {
        if m.success {
            agg.successful_queries += 1;
        }
        agg.total_cost += m.estimated_cost;
        latency_sum += m.latency_ms;
        iteration_sum += u64::from(m.iterations);
        *agg.queries_by_backend.entry(m.backend).or_default() += 1;
        *agg.queries_by_complexity.entry(m.complexity).or_default() += 1;
        *agg.queries_by_sensitivity.entry(m.sensitivity).or_default() += 1;
    }

    let total = agg.total_queries as f64;
    agg.failed_queries = agg.total_queries - agg.successful_queries;
    agg.success_rate = agg.successful_queries as f64 / total;
    agg.avg_latency_ms = latency_sum / total;
    agg.avg_iterations = iteration_sum as f64 / total;
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::metric;

    #[test]
    fn empty_window_is_zeroed() {
        let agg = aggregate(&[]);
        assert_eq!(agg.total_queries, 0);
        assert_eq!(agg.successful_queries, 0);
        assert_eq!(agg.failed_queries, 0);
        assert_eq!(agg.success_rate, 0.0);
        assert_eq!(agg.total_cost, 0.0);
        assert_eq!(agg.avg_latency_ms, 0.0);
        assert_eq!(agg.avg_iterations, 0.0);
        assert!(agg.queries_by_backend.is_empty());
    }

    #[test]
    fn counts_means_and_groups() {
        let mut failed = metric(Backend::ApiPremium, Complexity::Complex, 2);
        failed.success = false;
        failed.latency_ms = 3000.0;
        failed.iterations = 3;
        let metrics = vec![
            metric(Backend::ApiEconomy, Complexity::Simple, 0),
            metric(Backend::ApiEconomy, Complexity::Simple, 1),
            failed,
        ];

        let agg = aggregate(&metrics);
        assert_eq!(agg.total_queries, 3);
        assert_eq!(agg.successful_queries, 2);
        assert_eq!(agg.failed_queries, 1);
        assert!((agg.success_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((agg.avg_latency_ms - 5000.0 / 3.0).abs() < 1e-9);
        assert!((agg.avg_iterations - 5.0 / 3.0).abs() < 1e-12);
        assert!((agg.total_cost - (0.0003 * 2.0 + 0.015)).abs() < 1e-12);
        assert_eq!(agg.queries_by_backend[&Backend::ApiEconomy], 2);
        assert_eq!(agg.queries_by_backend[&Backend::ApiPremium], 1);
        assert_eq!(agg.queries_by_complexity[&Complexity::Simple], 2);
        assert_eq!(agg.queries_by_sensitivity[&Sensitivity::Internal], 3);
    }
}
