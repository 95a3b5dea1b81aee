// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry and analytics for Tiergate.
//!
//! Every execution leaves a [`QueryMetric`] in a bounded, FIFO-evicting
//! [`TelemetryStore`]. Read-only analyses work on snapshots of that store:
//! windowed aggregation, optimization recommendations, cost forecasting and a
//! flat JSON/CSV export.

pub mod aggregate;
pub mod export;
pub mod forecast;
pub mod metric;
pub mod recommend;
pub mod recording;
pub mod store;

pub use aggregate::{aggregate, AggregatedMetrics};
pub use export::{export, ExportFormat};
pub use forecast::{forecast, CostForecast, FORECAST_WINDOW};
pub use metric::{QueryMetric, TimeRange};
pub use recommend::{recommend, Recommendation, RecommendationKind, MIN_SAMPLES};
pub use store::TelemetryStore;
