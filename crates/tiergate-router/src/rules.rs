// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered routing rules.
//!
//! Each rule looks at the query context and the availability set and either
//! returns a [`Verdict`] or passes. Rules are tried in [`RULES`] order and the
//! first verdict wins. A rule whose preferred backends are all unavailable
//! passes, so evaluation always reaches the final fallback rule.

use tiergate_core::{Backend, Complexity, ExposureLevel, QueryContext, Sensitivity};
use tracing::warn;

use crate::availability::Availability;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RoutingInput<'a> {
    pub context: &'a QueryContext,
    pub available: Availability,
    /// Data-source identifier the in-perimeter engine is colocated with.
    pub in_perimeter_source: &'a str,
}

impl RoutingInput<'_> {
    /// Whether the query targets the store the in-perimeter engine sits next to.
    pub fn targets_in_perimeter_store(&self) -> bool {
        self.context
            .data_source
            .trim()
            .eq_ignore_ascii_case(self.in_perimeter_source.trim())
    }

    fn in_perimeter_usable(&self) -> bool {
        self.targets_in_perimeter_store() && self.available.contains(Backend::InPerimeter)
    }

    fn first_available(&self, candidates: &[Backend]) -> Option<Backend> {
        candidates
            .iter()
            .copied()
            .find(|b| self.available.contains(*b))
    }
}

/// A rule's choice: backend, explanation and how much data it may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub backend: Backend,
    pub reason: &'static str,
    pub exposure: ExposureLevel,
}

impl Verdict {
    fn new(backend: Backend, reason: &'static str, exposure: ExposureLevel) -> Self {
        Self {
            backend,
            reason,
            exposure,
        }
    }
}

/// One predicate/outcome pair in the precedence list.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub evaluate: fn(&RoutingInput<'_>) -> Option<Verdict>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// Routing precedence, highest first.
pub static RULES: [Rule; 7] = [
    Rule {
        name: "preference",
        evaluate: explicit_preference,
    },
    Rule {
        name: "in_perimeter_iteration",
        evaluate: in_perimeter_iteration,
    },
    Rule {
        name: "sensitive",
        evaluate: sensitive_data,
    },
    Rule {
        name: "simple",
        evaluate: simple_query,
    },
    Rule {
        name: "complex",
        evaluate: complex_query,
    },
    Rule {
        name: "default",
        evaluate: balanced_default,
    },
    Rule {
        name: "fallback",
        evaluate: safest_fallback,
    },
];

pub(crate) const PREFERENCE_REASON: &str = "user preference";
pub(crate) const FALLBACK_REASON: &str =
    "fallback: preferred backends unavailable, using safest available backend";

/// How much data `backend` may observe for data of `sensitivity`.
///
/// Backends inside the trust boundary always see full results. Remote APIs see
/// schema only for sensitive data, aggregates for internal data and
/// everything for public data.
pub fn exposure_for(backend: Backend, sensitivity: Sensitivity) -> ExposureLevel {
    if backend.is_full_data_capable() {
        return ExposureLevel::Full;
    }
    match sensitivity {
        Sensitivity::Confidential | Sensitivity::Restricted => ExposureLevel::SchemaOnly,
        Sensitivity::Internal => ExposureLevel::Aggregated,
        Sensitivity::Public => ExposureLevel::Full,
    }
}

/// Exposure for a fallback verdict: full inside the trust boundary, schema
/// only for any remote tier.
pub(crate) fn fallback_exposure(backend: Backend) -> ExposureLevel {
    if backend.is_full_data_capable() {
        ExposureLevel::Full
    } else {
        ExposureLevel::SchemaOnly
    }
}

/// The backend used when nothing more specific applies: any full-data-capable
/// backend first, then the cheapest remote tier.
pub(crate) fn safest_available(available: Availability) -> Option<Backend> {
    available
        .iter()
        .find(|b| b.is_full_data_capable())
        .or_else(|| {
            available.iter().min_by(|a, b| {
                a.spec()
                    .default_unit_cost_per_1k
                    .total_cmp(&b.spec().default_unit_cost_per_1k)
            })
        })
}

/// Remote tiers for schema-only work: the tier matching `complexity` first,
/// then the rest cheapest first.
fn remote_tiers_for(complexity: Complexity) -> [Backend; 3] {
    match Backend::schema_only_tier(complexity) {
        Backend::ApiBalanced => [Backend::ApiBalanced, Backend::ApiEconomy, Backend::ApiPremium],
        _ => [Backend::ApiEconomy, Backend::ApiBalanced, Backend::ApiPremium],
    }
}

fn explicit_preference(input: &RoutingInput<'_>) -> Option<Verdict> {
    let backend = input
        .context
        .preference
        .filter(|b| input.available.contains(*b))?;
    Some(Verdict::new(
        backend,
        PREFERENCE_REASON,
        exposure_for(backend, input.context.sensitivity),
    ))
}

fn in_perimeter_iteration(input: &RoutingInput<'_>) -> Option<Verdict> {
    (input.context.requires_iteration && input.in_perimeter_usable()).then(|| {
        Verdict::new(
            Backend::InPerimeter,
            "in-perimeter data with iteration: colocated engine allows safe full data access",
            ExposureLevel::Full,
        )
    })
}

fn sensitive_data(input: &RoutingInput<'_>) -> Option<Verdict> {
    let ctx = input.context;
    if !ctx.sensitivity.is_sensitive() {
        return None;
    }

    if !ctx.requires_iteration {
        let backend = input.first_available(&remote_tiers_for(ctx.complexity))?;
        return Some(Verdict::new(
            backend,
            "sensitive data, no iteration: schema-only remote API call",
            ExposureLevel::SchemaOnly,
        ));
    }

    if input.available.contains(Backend::SelfHosted) {
        return Some(Verdict::new(
            Backend::SelfHosted,
            "sensitive data requiring iteration: self-hosted model keeps results in perimeter",
            ExposureLevel::Full,
        ));
    }
    if input.in_perimeter_usable() {
        return Some(Verdict::new(
            Backend::InPerimeter,
            "sensitive in-perimeter data with iteration: colocated engine is safe",
            ExposureLevel::Full,
        ));
    }

    let backend = input.first_available(&remote_tiers_for(ctx.complexity))?;
    warn!(
        backend = %backend,
        sensitivity = %ctx.sensitivity,
        complexity = %ctx.complexity,
        "no full-access backend for sensitive iterative query; \
         falling back to schema-only remote API with reduced accuracy"
    );
    Some(Verdict::new(
        backend,
        "sensitive data with iteration but no full-access backend available: \
         schema-only remote API, reduced accuracy",
        ExposureLevel::SchemaOnly,
    ))
}

fn simple_query(input: &RoutingInput<'_>) -> Option<Verdict> {
    if input.context.complexity != Complexity::Simple {
        return None;
    }
    if input.in_perimeter_usable() {
        return Some(Verdict::new(
            Backend::InPerimeter,
            "simple query on in-perimeter data: colocated engine is efficient",
            ExposureLevel::Full,
        ));
    }
    input.available.contains(Backend::ApiEconomy).then(|| {
        Verdict::new(
            Backend::ApiEconomy,
            "simple query: economy tier is fastest and cheapest",
            ExposureLevel::SchemaOnly,
        )
    })
}

fn complex_query(input: &RoutingInput<'_>) -> Option<Verdict> {
    if input.context.complexity != Complexity::Complex {
        return None;
    }
    if input.in_perimeter_usable() {
        return Some(Verdict::new(
            Backend::InPerimeter,
            "complex analysis on in-perimeter data: colocated engine for accuracy and data access",
            ExposureLevel::Full,
        ));
    }
    let exposure = if input.context.requires_iteration {
        ExposureLevel::Aggregated
    } else {
        ExposureLevel::SchemaOnly
    };
    input.available.contains(Backend::ApiPremium).then(|| {
        Verdict::new(
            Backend::ApiPremium,
            "complex analysis: premium tier for highest accuracy",
            exposure,
        )
    })
}

fn balanced_default(input: &RoutingInput<'_>) -> Option<Verdict> {
    input.available.contains(Backend::ApiBalanced).then(|| {
        Verdict::new(
            Backend::ApiBalanced,
            "default balanced option: good accuracy and cost",
            ExposureLevel::SchemaOnly,
        )
    })
}

fn safest_fallback(input: &RoutingInput<'_>) -> Option<Verdict> {
    let backend = safest_available(input.available)?;
    Some(Verdict::new(backend, FALLBACK_REASON, fallback_exposure(backend)))
}
