// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Advisory optimization suggestions derived from query history.
//!
//! Every check runs independently over the same snapshot and may add one
//! advisory. Below [`MIN_SAMPLES`] nothing is checked and a single
//! insufficient-data advisory is returned; when no check fires a single
//! no-action advisory is returned instead.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::{AsRefStr, Display};
use tiergate_core::{Backend, Complexity};

use crate::metric::QueryMetric;

/// History needed before any check runs.
pub const MIN_SAMPLES: usize = 10;

/// Reliability and performance look at this many most recent samples.
pub const RECENT_WINDOW: usize = 100;

const PREMIUM_SHARE_PERCENT: usize = 30;
const PREMIUM_SAVINGS_FRACTION: f64 = 0.8;
const FAILURE_RATE_THRESHOLD: f64 = 0.1;
const SLOW_LATENCY_MS: f64 = 5000.0;
const COST_CONCENTRATION_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    InsufficientData,
    NoActionNeeded,
    CostOptimization,
    DataPrivacy,
    Reliability,
    Performance,
    CostDistribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub impact: String,
}

impl Recommendation {
    fn new(kind: RecommendationKind, message: String, impact: impl Into<String>) -> Self {
        Self {
            kind,
            message,
            impact: impact.into(),
        }
    }
}

type Check = fn(&[QueryMetric]) -> Option<Recommendation>;

const CHECKS: [Check; 5] = [
    premium_simple_queries,
    iterative_remote_queries,
    recent_failure_rate,
    recent_latency,
    cost_concentration,
];

/// Run every check over `metrics` (oldest first).
pub fn recommend(metrics: &[QueryMetric]) -> Vec<Recommendation> {
    if metrics.len() < MIN_SAMPLES {
        return vec![Recommendation::new(
            RecommendationKind::InsufficientData,
            format!(
                "Need at least {MIN_SAMPLES} queries for recommendations, have {}",
                metrics.len()
            ),
            "N/A",
        )];
    }

    let mut advisories: Vec<_> = CHECKS.iter().filter_map(|check| check(metrics)).collect();
    if advisories.is_empty() {
        advisories.push(Recommendation::new(
            RecommendationKind::NoActionNeeded,
            "No optimization opportunities identified. Current routing is efficient.".to_string(),
            "N/A",
        ));
    }
    advisories
}

fn recent(metrics: &[QueryMetric]) -> &[QueryMetric] {
    &metrics[metrics.len().saturating_sub(RECENT_WINDOW)..]
}

fn premium_simple_queries(metrics: &[QueryMetric]) -> Option<Recommendation> {
    let simple: Vec<_> = metrics
        .iter()
        .filter(|m| m.complexity == Complexity::Simple)
        .collect();
    let premium: Vec<_> = simple
        .iter()
        .filter(|m| m.backend.is_premium_priced())
        .collect();
    if premium.is_empty() || premium.len() * 100 < simple.len() * PREMIUM_SHARE_PERCENT {
        return None;
    }

    let savings = premium.iter().map(|m| m.estimated_cost).sum::<f64>() * PREMIUM_SAVINGS_FRACTION;
    let share = premium.len() as f64 / simple.len() as f64 * 100.0;
    Some(Recommendation::new(
        RecommendationKind::CostOptimization,
        format!(
            "{} simple queries ({share:.0}%) are using premium backends. \
             Route to {} or {} to save ~80%.",
            premium.len(),
            Backend::ApiEconomy,
            Backend::InPerimeter,
        ),
        format!("~${savings:.2} potential savings"),
    ))
}

fn iterative_remote_queries(metrics: &[QueryMetric]) -> Option<Recommendation> {
    let count = metrics
        .iter()
        .filter(|m| m.iterations > 1 && m.backend.is_remote_api())
        .count();
    (count > 0).then(|| {
        Recommendation::new(
            RecommendationKind::DataPrivacy,
            format!(
                "{count} queries required iteration with a remote API backend. \
                 Consider {} or {} for these to enable safe full data access and improve accuracy.",
                Backend::InPerimeter,
                Backend::SelfHosted,
            ),
            "Better accuracy + data privacy",
        )
    })
}

fn recent_failure_rate(metrics: &[QueryMetric]) -> Option<Recommendation> {
    let window = recent(metrics);
    if window.is_empty() {
        return None;
    }
    let failures = window.iter().filter(|m| !m.success).count();
    let rate = failures as f64 / window.len() as f64;
    (rate > FAILURE_RATE_THRESHOLD).then(|| {
        Recommendation::new(
            RecommendationKind::Reliability,
            format!(
                "Failure rate is {:.1}% (last {} queries). \
                 Review error patterns and consider adding retries or fallbacks.",
                rate * 100.0,
                window.len()
            ),
            "Improved reliability",
        )
    })
}

fn recent_latency(metrics: &[QueryMetric]) -> Option<Recommendation> {
    let window = recent(metrics);
    if window.is_empty() {
        return None;
    }
    let mean = window.iter().map(|m| m.latency_ms).sum::<f64>() / window.len() as f64;
    if mean <= SLOW_LATENCY_MS {
        return None;
    }

    let mut slow: BTreeMap<Backend, (f64, usize)> = BTreeMap::new();
    for m in window.iter().filter(|m| m.latency_ms > SLOW_LATENCY_MS) {
        let entry = slow.entry(m.backend).or_default();
        entry.0 += m.latency_ms;
        entry.1 += 1;
    }
    let (slowest, slowest_avg) = slow
        .into_iter()
        .map(|(backend, (sum, count))| (backend, sum / count as f64))
        .max_by(|a, b| a.1.total_cmp(&b.1))?;

    Some(Recommendation::new(
        RecommendationKind::Performance,
        format!(
            "Average latency is {:.1}s. {slowest} is slowest with avg {:.1}s. \
             Consider caching or using faster backends for common queries.",
            mean / 1000.0,
            slowest_avg / 1000.0
        ),
        "Better user experience",
    ))
}

fn cost_concentration(metrics: &[QueryMetric]) -> Option<Recommendation> {
    let total: f64 = metrics.iter().map(|m| m.estimated_cost).sum();
    if total <= 0.0 {
        return None;
    }

    let mut by_backend: BTreeMap<Backend, f64> = BTreeMap::new();
    for m in metrics {
        *by_backend.entry(m.backend).or_default() += m.estimated_cost;
    }
    let (top, cost) = by_backend
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    (cost > total * COST_CONCENTRATION_THRESHOLD).then(|| {
        Recommendation::new(
            RecommendationKind::CostDistribution,
            format!(
                "{top} accounts for {:.0}% of total cost (${cost:.2}). \
                 Consider load balancing or using cheaper alternatives for some queries.",
                cost / total * 100.0
            ),
            "Cost optimization opportunity",
        )
    })
}
