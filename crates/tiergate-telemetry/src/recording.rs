// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; with no recorder installed every call is a
//! no-op.

use metrics::{describe_counter, describe_histogram};
use tiergate_core::{Backend, ExposureLevel};

/// Counters only take integers, so spend is accumulated in micro-USD.
pub const ESTIMATED_COST_COUNTER: &str = "tiergate_estimated_cost_micro_usd_total";

fn micro_usd(cost_usd: f64) -> u64 {
    (cost_usd.max(0.0) * 1_000_000.0).round() as u64
}

/// Register all Tiergate metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "tiergate_queries_routed_total",
        "Queries routed, by backend and exposure level"
    );
    describe_counter!(
        "tiergate_executions_total",
        "Backend executions, by backend and outcome"
    );
    describe_counter!(
        ESTIMATED_COST_COUNTER,
        "Estimated spend in micro-USD"
    );
    describe_counter!(
        "tiergate_telemetry_evictions_total",
        "Query metrics evicted from the bounded store"
    );
    describe_histogram!(
        "tiergate_execution_latency_seconds",
        "Backend dispatch latency in seconds"
    );
}

/// Record a routing decision.
pub fn record_routed(backend: Backend, exposure: ExposureLevel) {
    metrics::counter!(
        "tiergate_queries_routed_total",
        "backend" => backend.as_ref().to_string(),
        "exposure" => exposure.as_ref().to_string()
    )
    .increment(1);
}

/// Record a finished execution with its latency and estimated cost.
pub fn record_execution(backend: Backend, success: bool, latency_seconds: f64, cost_usd: f64) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(
        "tiergate_executions_total",
        "backend" => backend.as_ref().to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::counter!(
        ESTIMATED_COST_COUNTER,
        "backend" => backend.as_ref().to_string()
    )
    .increment(micro_usd(cost_usd));
    metrics::histogram!(
        "tiergate_execution_latency_seconds",
        "backend" => backend.as_ref().to_string()
    )
    .record(latency_seconds);
}

/// Record one FIFO eviction from the telemetry store.
pub fn record_eviction() {
    metrics::counter!("tiergate_telemetry_evictions_total").increment(1);
}
