// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for query-metric fixtures.

use chrono::{DateTime, Duration, Utc};
use tiergate_core::{Backend, Complexity, Sensitivity};
use tiergate_telemetry::QueryMetric;

/// Builder for a [`QueryMetric`] with sensible defaults: successful,
/// single-pass, internal, moderate, one second latency, table-price cost.
#[derive(Debug, Clone)]
pub struct MetricFixture {
    metric: QueryMetric,
}

impl MetricFixture {
    pub fn new(backend: Backend) -> Self {
        Self {
            metric: QueryMetric {
                timestamp: Utc::now(),
                question: "fixture question".to_string(),
                sensitivity: Sensitivity::Internal,
                complexity: Complexity::Moderate,
                backend,
                success: true,
                iterations: 1,
                latency_ms: 1000.0,
                estimated_cost: backend.spec().default_unit_cost_per_1k,
                actual_tokens: None,
                user_id: None,
                session_id: None,
            },
        }
    }

    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.metric.question = question.into();
        self
    }

    pub fn sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.metric.sensitivity = sensitivity;
        self
    }

    pub fn complexity(mut self, complexity: Complexity) -> Self {
        self.metric.complexity = complexity;
        self
    }

    pub fn failed(mut self) -> Self {
        self.metric.success = false;
        self
    }

    pub fn iterations(mut self, iterations: u32) -> Self {
        self.metric.iterations = iterations;
        self
    }

    pub fn latency_ms(mut self, latency_ms: f64) -> Self {
        self.metric.latency_ms = latency_ms;
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.metric.estimated_cost = cost;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.metric.timestamp = timestamp;
        self
    }

    /// Shift the timestamp back by `ago`.
    pub fn ago(mut self, ago: Duration) -> Self {
        self.metric.timestamp -= ago;
        self
    }

    pub fn build(self) -> QueryMetric {
        self.metric
    }

    /// `n` copies spaced one minute apart, oldest first, ending now.
    pub fn series(self, n: usize) -> Vec<QueryMetric> {
        let end = self.metric.timestamp;
        (0..n)
            .map(|i| {
                let mut m = self.metric.clone();
                m.timestamp = end - Duration::minutes((n - 1 - i) as i64);
                m.question = format!("{} #{i}", self.metric.question);
                m
            })
            .collect()
    }
}
