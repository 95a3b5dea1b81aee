// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text and JSON rendering of telemetry reports.

use serde::Serialize;
use tiergate_telemetry::{
    AggregatedMetrics, CostForecast, Recommendation, RecommendationKind, TelemetryStore,
};

/// Aggregate, advisories and forecast for one store snapshot.
#[derive(Debug, Serialize)]
pub struct Report {
    pub aggregate: AggregatedMetrics,
    pub recommendations: Vec<Recommendation>,
    pub forecast: Option<CostForecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_error: Option<String>,
}

impl Report {
    pub fn collect(store: &TelemetryStore, days: u32) -> Self {
        let snapshot = store.snapshot();
        let (forecast, forecast_error) = match tiergate_telemetry::forecast(&snapshot, days) {
            Ok(f) => (Some(f), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            aggregate: tiergate_telemetry::aggregate(&snapshot),
            recommendations: tiergate_telemetry::recommend(&snapshot),
            forecast,
            forecast_error,
        }
    }
}

/// Print `report` with optional colors.
pub fn print_report(report: &Report, use_color: bool) {
    let agg = &report.aggregate;
    println!();
    println!("  tiergate report");
    println!("  {}", "-".repeat(35));
    println!(
        "    Queries:    {} ({} ok, {} failed, {:.1}% success)",
        agg.total_queries,
        agg.successful_queries,
        agg.failed_queries,
        agg.success_rate * 100.0
    );
    println!("    Cost:       ${:.4}", agg.total_cost);
    println!("    Latency:    {:.1} ms avg", agg.avg_latency_ms);
    println!("    Iterations: {:.2} avg", agg.avg_iterations);

    println!();
    println!("  By backend");
    for (backend, count) in &agg.queries_by_backend {
        println!("    {:<14} {count}", backend.to_string());
    }

    println!();
    println!("  Recommendations");
    for rec in &report.recommendations {
        let tag = format!("[{}]", rec.kind);
        if use_color {
            use colored::Colorize;
            let tag = match rec.kind {
                RecommendationKind::NoActionNeeded => tag.green(),
                RecommendationKind::InsufficientData => tag.dimmed(),
                _ => tag.yellow(),
            };
            println!("    {tag} {}", rec.message);
        } else {
            println!("    {tag} {}", rec.message);
        }
        println!("      impact: {}", rec.impact);
    }

    println!();
    match (&report.forecast, &report.forecast_error) {
        (Some(f), _) => {
            println!("  Forecast ({} days)", f.forecast_period_days);
            println!(
                "    Queries:    {} ({:.1}/day)",
                f.projected_queries, f.daily_query_rate
            );
            println!(
                "    Cost:       ${:.4} (${:.4}/day)",
                f.projected_cost, f.daily_cost_rate
            );
            for (backend, cost) in &f.cost_by_backend {
                println!("    {:<14} ${cost:.4}", backend.to_string());
            }
        }
        (None, Some(err)) => println!("  Forecast unavailable: {err}"),
        (None, None) => {}
    }
    println!();
}
