// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-execution telemetry record and time-window filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tiergate_core::{Backend, Complexity, Sensitivity};

/// Outcome of one executed query. Created once at completion, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetric {
    pub timestamp: DateTime<Utc>,
    /// Natural-language question as asked.
    pub question: String,
    pub sensitivity: Sensitivity,
    pub complexity: Complexity,
    pub backend: Backend,
    pub success: bool,
    /// Refinement rounds spent; 1 for single-pass and failed executions.
    pub iterations: u32,
    /// Wall-clock dispatch latency in milliseconds.
    pub latency_ms: f64,
    /// Estimated cost in USD from the routing decision.
    pub estimated_cost: f64,
    /// Tokens the backend reported consuming, if any.
    pub actual_tokens: Option<u32>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

/// Inclusive time bounds. An open end matches everything on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Unbounded range matching every metric.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn until(end: DateTime<Utc>) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| timestamp >= start)
            && self.end.is_none_or(|end| timestamp <= end)
    }
}
