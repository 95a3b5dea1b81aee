// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linear volume and cost projection from recent history.

use std::collections::BTreeMap;

use serde::Serialize;
use tiergate_core::{Backend, TiergateError};

use crate::metric::QueryMetric;

/// Only the most recent samples feed the projection.
pub const FORECAST_WINDOW: usize = 1000;

/// Spans shorter than this many days are treated as one full day.
const MIN_SPAN_DAYS: f64 = 0.1;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Projected volume and spend over `forecast_period_days`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostForecast {
    pub forecast_period_days: u32,
    pub projected_queries: u64,
    pub projected_cost: f64,
    pub daily_query_rate: f64,
    pub daily_cost_rate: f64,
    pub cost_by_backend: BTreeMap<Backend, f64>,
    /// Samples the rates were derived from.
    pub samples: usize,
    /// Observed span in days after flooring.
    pub span_days: f64,
}

/// Project the next `days` days from up to [`FORECAST_WINDOW`] recent metrics.
///
/// Fails with [`TiergateError::InsufficientData`] below two samples.
pub fn forecast(metrics: &[QueryMetric], days: u32) -> Result<CostForecast, TiergateError> {
    let window = &metrics[metrics.len().saturating_sub(FORECAST_WINDOW)..];
    let (Some(oldest), Some(newest)) = (
        window.iter().map(|m| m.timestamp).min(),
        window.iter().map(|m| m.timestamp).max(),
    ) else {
        return Err(TiergateError::InsufficientData { needed: 2, have: 0 });
    };
    if window.len() < 2 {
        return Err(TiergateError::InsufficientData {
            needed: 2,
            have: window.len(),
        });
    }

    let mut span_days = (newest - oldest).num_milliseconds() as f64 / MILLIS_PER_DAY;
    if span_days < MIN_SPAN_DAYS {
        span_days = 1.0;
    }

    let scale = f64::from(days) / span_days;
    let mut cost_by_backend: BTreeMap<Backend, f64> = BTreeMap::new();
    let mut total_cost = 0.0;
    for m in window {
        total_cost += m.estimated_cost;
        *cost_by_backend.entry(m.backend).or_default() += m.estimated_cost;
    }
    for cost in cost_by_backend.values_mut() {
        *cost *= scale;
    }

    let daily_query_rate = window.len() as f64 / span_days;
    let daily_cost_rate = total_cost / span_days;
    Ok(CostForecast {
        forecast_period_days: days,
        projected_queries: (daily_query_rate * f64::from(days)).floor() as u64,
        projected_cost: daily_cost_rate * f64::from(days),
        daily_query_rate,
        daily_cost_rate,
        cost_by_backend,
        samples: window.len(),
        span_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::metric;
    use tiergate_core::Complexity;

    #[test]
    fn needs_two_samples() {
        let err = forecast(&[], 30).unwrap_err();
        assert!(matches!(err, TiergateError::InsufficientData { needed: 2, have: 0 }));

        let one = [metric(Backend::ApiEconomy, Complexity::Simple, 0)];
        let err = forecast(&one, 30).unwrap_err();
        assert!(matches!(err, TiergateError::InsufficientData { needed: 2, have: 1 }));
    }

    #[test]
    fn short_span_is_floored_to_one_day() {
        let metrics: Vec<_> = (0..10)
            .map(|i| metric(Backend::ApiPremium, Complexity::Complex, i))
            .collect();
        let f = forecast(&metrics, 30).unwrap();
        assert_eq!(f.span_days, 1.0);
        assert!((f.daily_query_rate - 10.0).abs() < 1e-12);
        assert_eq!(f.projected_queries, 300);
        assert!((f.projected_cost - 10.0 * 0.015 * 30.0).abs() < 1e-9);
        assert!((f.cost_by_backend[&Backend::ApiPremium] - f.projected_cost).abs() < 1e-9);
    }

    #[test]
    fn rates_follow_observed_span() {
        let day = 86_400;
        let metrics = vec![
            metric(Backend::ApiEconomy, Complexity::Simple, 0),
            metric(Backend::ApiBalanced, Complexity::Moderate, day),
            metric(Backend::ApiBalanced, Complexity::Moderate, 2 * day),
            metric(Backend::ApiEconomy, Complexity::Simple, 4 * day),
        ];
        let f = forecast(&metrics, 7).unwrap();
        assert!((f.span_days - 4.0).abs() < 1e-12);
        assert!((f.daily_query_rate - 1.0).abs() < 1e-12);
        assert_eq!(f.projected_queries, 7);
        let balanced = 2.0 * 0.003 / 4.0 * 7.0;
        assert!((f.cost_by_backend[&Backend::ApiBalanced] - balanced).abs() < 1e-12);
        let summed: f64 = f.cost_by_backend.values().sum();
        assert!((summed - f.projected_cost).abs() < 1e-12);
    }

    #[test]
    fn only_recent_window_is_used() {
        let metrics: Vec<_> = (0..1500)
            .map(|i| metric(Backend::SelfHosted, Complexity::Simple, i))
            .collect();
        let f = forecast(&metrics, 1).unwrap();
        assert_eq!(f.samples, FORECAST_WINDOW);
        assert_eq!(f.projected_queries, 1000);
    }
}
