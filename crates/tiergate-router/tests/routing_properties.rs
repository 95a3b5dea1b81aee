// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing invariants over arbitrary contexts and availability sets.

use std::sync::Arc;

use proptest::prelude::*;
use tiergate_core::{Backend, Complexity, ExposureLevel, QueryContext, Sensitivity, BACKEND_TABLE};
use tiergate_cost::PriceTable;
use tiergate_router::{Availability, Router};
use tiergate_telemetry::TelemetryStore;

fn sensitivity() -> impl Strategy<Value = Sensitivity> {
    prop_oneof![
        Just(Sensitivity::Public),
        Just(Sensitivity::Internal),
        Just(Sensitivity::Confidential),
        Just(Sensitivity::Restricted),
    ]
}

fn complexity() -> impl Strategy<Value = Complexity> {
    prop_oneof![
        Just(Complexity::Simple),
        Just(Complexity::Moderate),
        Just(Complexity::Complex),
    ]
}

fn backend() -> impl Strategy<Value = Backend> {
    (0usize..BACKEND_TABLE.len()).prop_map(|i| BACKEND_TABLE[i].backend)
}

/// Non-empty availability sets.
fn availability() -> impl Strategy<Value = Availability> {
    (1u8..32).prop_map(|bits| {
        BACKEND_TABLE
            .iter()
            .enumerate()
            .filter(|(i, _)| bits & (1 << i) != 0)
            .map(|(_, spec)| spec.backend)
            .collect()
    })
}

fn context() -> impl Strategy<Value = QueryContext> {
    (
        sensitivity(),
        complexity(),
        any::<bool>(),
        prop_oneof![Just("snowflake"), Just("postgres")],
        0u32..20_000,
        proptest::option::of(backend()),
    )
        .prop_map(|(s, c, iterate, source, tokens, preference)| {
            let mut ctx = QueryContext::new("generated question", source, s, c)
                .with_iteration(iterate)
                .with_estimated_tokens(tokens);
            ctx.preference = preference;
            ctx
        })
}

fn router(available: Availability) -> Router {
    Router::new(
        available,
        "snowflake",
        PriceTable::default(),
        Arc::new(TelemetryStore::new(1)),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn decision_names_an_available_backend(ctx in context(), available in availability()) {
        let d = router(available).route(&ctx);
        prop_assert!(available.contains(d.backend));
    }

    #[test]
    fn sensitive_data_never_fully_exposed_to_remote_api(
        ctx in context(),
        available in availability(),
    ) {
        let d = router(available).route(&ctx);
        if ctx.sensitivity.is_sensitive() && !d.backend.is_full_data_capable() {
            prop_assert!(d.exposure <= ExposureLevel::Aggregated);
        }
        if d.backend.is_full_data_capable() {
            prop_assert_eq!(d.exposure, ExposureLevel::Full);
        } else if d.reason.starts_with("fallback") {
            prop_assert_eq!(d.exposure, ExposureLevel::SchemaOnly);
        }
    }

    #[test]
    fn available_preference_is_always_honored(
        ctx in context(),
        wanted in backend(),
        available in availability(),
    ) {
        let ctx = ctx.with_preference(wanted);
        let d = router(available).route(&ctx);
        if available.contains(wanted) {
            prop_assert_eq!(d.backend, wanted);
            prop_assert_eq!(d.reason.as_str(), "user preference");
        } else {
            prop_assert_ne!(d.reason.as_str(), "user preference");
        }
    }

    #[test]
    fn cost_is_non_negative_and_zero_tokens_match_default(
        ctx in context(),
        available in availability(),
    ) {
        let r = router(available);
        let d = r.route(&ctx);
        prop_assert!(d.estimated_cost >= 0.0);

        let zero = r.route(&ctx.clone().with_estimated_tokens(0));
        let thousand = r.route(&ctx.with_estimated_tokens(1000));
        prop_assert_eq!(zero.backend, thousand.backend);
        prop_assert_eq!(zero.estimated_cost, thousand.estimated_cost);
    }
}

#[test]
fn restricted_complex_iteration_without_perimeter_goes_remote_schema_only() {
    let available = Availability::all()
        .without(Backend::SelfHosted)
        .without(Backend::InPerimeter);
    let ctx = QueryContext::new(
        "Churn cohort analysis",
        "snowflake",
        Sensitivity::Restricted,
        Complexity::Complex,
    )
    .with_iteration(true);
    let d = router(available).route(&ctx);
    assert!(d.backend.is_remote_api());
    assert_eq!(d.exposure, ExposureLevel::SchemaOnly);
}
