// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The policy engine and execution dispatcher.
//!
//! Routing order: explicit preference > in-perimeter iteration > sensitive
//! data > simple > complex > balanced default > safest available fallback.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tiergate_config::model::{RouterConfig, TiergateConfig};
use tiergate_core::{
    AdapterResponse, Backend, BackendAdapter, ExposureLevel, QueryContext, RoutingDecision,
    TiergateError,
};
use tiergate_cost::PriceTable;
use tiergate_telemetry::{recording, QueryMetric, TelemetryStore};
use tracing::{info, warn};

use crate::availability::Availability;
use crate::outcome::{ExecutionOutcome, ExecutionTags};
use crate::rules::{
    exposure_for, fallback_exposure, safest_available, RoutingInput, Verdict, FALLBACK_REASON,
    RULES,
};

/// Chooses a backend for each query and dispatches it.
///
/// Availability, prices and adapters are fixed at construction; `route` reads
/// no mutable state and can be called concurrently from any number of tasks.
pub struct Router {
    available: Availability,
    in_perimeter_source: String,
    prices: PriceTable,
    adapters: HashMap<Backend, Arc<dyn BackendAdapter>>,
    telemetry: Arc<TelemetryStore>,
    fallback: Backend,
}

impl Router {
    /// Create a router with no adapters. `execute` on such a router records a
    /// configuration failure; `route` works normally.
    pub fn new(
        available: Availability,
        in_perimeter_source: impl Into<String>,
        prices: PriceTable,
        telemetry: Arc<TelemetryStore>,
    ) -> Result<Self, TiergateError> {
        Self::assemble(
            available,
            in_perimeter_source.into(),
            prices,
            HashMap::new(),
            telemetry,
        )
    }

    /// Policy-only router for the enabled backends in `config`.
    pub fn from_config(config: &TiergateConfig) -> Result<Self, TiergateError> {
        Self::new(
            Availability::from_config(&config.backends),
            config.router.in_perimeter_source.clone(),
            PriceTable::from_config(&config.backends),
            Arc::new(TelemetryStore::from_config(&config.telemetry)),
        )
    }

    /// Router that dispatches to `adapters`.
    ///
    /// A backend is available only if it is enabled in `config` and an adapter
    /// for it is registered. A later adapter for the same backend replaces an
    /// earlier one.
    pub fn with_adapters(
        config: &TiergateConfig,
        adapters: impl IntoIterator<Item = Arc<dyn BackendAdapter>>,
        telemetry: Arc<TelemetryStore>,
    ) -> Result<Self, TiergateError> {
        let adapters: HashMap<Backend, Arc<dyn BackendAdapter>> = adapters
            .into_iter()
            .map(|adapter| (adapter.backend(), adapter))
            .collect();
        let registered: Availability = adapters.keys().copied().collect();
        let available = Availability::from_config(&config.backends).intersect(registered);

        Self::assemble(
            available,
            config.router.in_perimeter_source.clone(),
            PriceTable::from_config(&config.backends),
            adapters,
            telemetry,
        )
    }

    fn assemble(
        available: Availability,
        in_perimeter_source: String,
        prices: PriceTable,
        adapters: HashMap<Backend, Arc<dyn BackendAdapter>>,
        telemetry: Arc<TelemetryStore>,
    ) -> Result<Self, TiergateError> {
        let fallback = safest_available(available).ok_or_else(|| {
            TiergateError::Configuration(
                "no backend is available: enable at least one backend and register its adapter"
                    .to_string(),
            )
        })?;

        info!(
            available = ?available,
            in_perimeter_source = in_perimeter_source.as_str(),
            fallback = %fallback,
            "router ready"
        );

        Ok(Self {
            available,
            in_perimeter_source,
            prices,
            adapters,
            telemetry,
            fallback,
        })
    }

    pub fn available(&self) -> Availability {
        self.available
    }

    pub fn in_perimeter_source(&self) -> &str {
        &self.in_perimeter_source
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// The store every execution is recorded in.
    pub fn telemetry(&self) -> &Arc<TelemetryStore> {
        &self.telemetry
    }

    /// Choose a backend for `context`. Never fails and never names an
    /// unavailable backend.
    pub fn route(&self, context: &QueryContext) -> RoutingDecision {
        let input = RoutingInput {
            context,
            available: self.available,
            in_perimeter_source: &self.in_perimeter_source,
        };

        let (rule, verdict) = RULES
            .iter()
            .find_map(|rule| (rule.evaluate)(&input).map(|v| (rule.name, v)))
            .unwrap_or((
                "fallback",
                Verdict {
                    backend: self.fallback,
                    reason: FALLBACK_REASON,
                    exposure: fallback_exposure(self.fallback),
                },
            ));

        let decision = self.decide(context, verdict.backend, verdict.reason, verdict.exposure);
        info!(
            rule,
            backend = %decision.backend,
            exposure = %decision.exposure,
            estimated_cost = decision.estimated_cost,
            reason = decision.reason.as_str(),
            "routed query"
        );
        decision
    }

    /// Route to an explicitly named backend, bypassing the rules.
    ///
    /// Fails with [`TiergateError::Configuration`] if `backend` is unavailable.
    pub fn route_to(
        &self,
        context: &QueryContext,
        backend: Backend,
    ) -> Result<RoutingDecision, TiergateError> {
        if !self.available.contains(backend) {
            return Err(TiergateError::Configuration(format!(
                "backend {backend} is not available"
            )));
        }
        Ok(self.decide(
            context,
            backend,
            "explicit backend",
            exposure_for(backend, context.sensitivity),
        ))
    }

    fn decide(
        &self,
        context: &QueryContext,
        backend: Backend,
        reason: &str,
        exposure: ExposureLevel,
    ) -> RoutingDecision {
        RoutingDecision {
            backend,
            reason: reason.to_string(),
            estimated_cost: self.prices.estimate(backend, context.estimated_tokens),
            exposure,
        }
    }

    /// Route and dispatch `context`, recording the outcome.
    pub async fn execute(&self, context: &QueryContext) -> ExecutionOutcome {
        self.execute_tagged(context, ExecutionTags::default()).await
    }

    /// Like [`execute`](Self::execute), recording caller identifiers on the metric.
    pub async fn execute_tagged(
        &self,
        context: &QueryContext,
        tags: ExecutionTags,
    ) -> ExecutionOutcome {
        let routing = self.route(context);
        let started = Instant::now();
        let result = match self.adapters.get(&routing.backend) {
            Some(adapter) => adapter.invoke(context, &routing).await,
            None => Err(TiergateError::Configuration(format!(
                "no adapter registered for backend {}",
                routing.backend
            ))),
        };
        let latency = started.elapsed();

        match &result {
            Ok(response) => info!(
                backend = %routing.backend,
                iterations = response.iterations,
                latency_ms = latency.as_millis() as u64,
                "query executed"
            ),
            Err(e) => warn!(
                backend = %routing.backend,
                error = %e,
                latency_ms = latency.as_millis() as u64,
                "query execution failed"
            ),
        }

        let (iterations, actual_tokens) = match &result {
            Ok(AdapterResponse {
                iterations,
                tokens_used,
                ..
            }) => ((*iterations).max(1), *tokens_used),
            Err(_) => (1, None),
        };

        recording::record_routed(routing.backend, routing.exposure);
        recording::record_execution(
            routing.backend,
            result.is_ok(),
            latency.as_secs_f64(),
            routing.estimated_cost,
        );
        self.telemetry.append(QueryMetric {
            timestamp: Utc::now(),
            question: context.question.clone(),
            sensitivity: context.sensitivity,
            complexity: context.complexity,
            backend: routing.backend,
            success: result.is_ok(),
            iterations,
            latency_ms: latency.as_secs_f64() * 1000.0,
            estimated_cost: routing.estimated_cost,
            actual_tokens,
            user_id: tags.user_id,
            session_id: tags.session_id,
        });

        ExecutionOutcome {
            routing,
            result,
            latency,
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("available", &self.available)
            .field("in_perimeter_source", &self.in_perimeter_source)
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// Route from raw category names with every backend available.
///
/// Returns the chosen backend's name.
pub fn quick_route(
    question: &str,
    data_source: &str,
    sensitivity: &str,
    complexity: &str,
    needs_iteration: bool,
) -> Result<String, TiergateError> {
    let context = QueryContext::parse(
        question,
        data_source,
        sensitivity,
        complexity,
        needs_iteration,
    )?;
    let router = Router::new(
        Availability::all(),
        RouterConfig::default().in_perimeter_source,
        PriceTable::default(),
        Arc::new(TelemetryStore::new(1)),
    )?;
    Ok(router.route(&context).backend.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiergate_core::{Complexity, Sensitivity};

    fn router(available: Availability) -> Router {
        Router::new(
            available,
            "snowflake",
            PriceTable::default(),
            Arc::new(TelemetryStore::new(100)),
        )
        .unwrap()
    }

    #[test]
    fn construction_requires_an_available_backend() {
        let err = Router::new(
            Availability::none(),
            "snowflake",
            PriceTable::default(),
            Arc::new(TelemetryStore::new(1)),
        )
        .unwrap_err();
        assert!(matches!(err, TiergateError::Configuration(_)));

        let mut config = TiergateConfig::default();
        for backend in [Backend::InPerimeter, Backend::SelfHosted, Backend::ApiEconomy] {
            config.backends.get_mut(backend).enabled = false;
        }
        let r = Router::from_config(&config).unwrap();
        assert_eq!(
            r.available().iter().collect::<Vec<_>>(),
            [Backend::ApiBalanced, Backend::ApiPremium]
        );
    }

    #[test]
    fn internal_simple_in_perimeter_goes_to_colocated_engine() {
        let context = QueryContext::new(
            "Orders today",
            "snowflake",
            Sensitivity::Internal,
            Complexity::Simple,
        );
        let d = router(Availability::all()).route(&context);
        assert_eq!(d.backend, Backend::InPerimeter);
        assert_eq!(d.exposure, ExposureLevel::Full);
    }

    #[test]
    fn unknown_tokens_cost_as_one_thousand() {
        let r = router(Availability::all());
        let context = QueryContext::new("q", "postgres", Sensitivity::Public, Complexity::Complex);
        let zero = r.route(&context);
        let thousand = r.route(&context.clone().with_estimated_tokens(1000));
        assert_eq!(zero.backend, Backend::ApiPremium);
        assert!((zero.estimated_cost - 0.015).abs() < 1e-12);
        assert_eq!(zero.estimated_cost, thousand.estimated_cost);

        let big = r.route(&context.with_estimated_tokens(4000));
        assert!((big.estimated_cost - 0.06).abs() < 1e-12);
    }

    #[test]
    fn unavailable_preference_falls_through() {
        let r = router(Availability::all().without(Backend::ApiPremium));
        let context = QueryContext::new("q", "postgres", Sensitivity::Public, Complexity::Moderate)
            .with_preference(Backend::ApiPremium);
        let d = r.route(&context);
        assert_eq!(d.backend, Backend::ApiBalanced);
        assert_ne!(d.reason, "user preference");
    }

    #[test]
    fn fallback_when_every_preferred_tier_is_missing() {
        let r = router([Backend::SelfHosted].into_iter().collect());
        let context = QueryContext::new("q", "postgres", Sensitivity::Public, Complexity::Complex);
        let d = r.route(&context);
        assert_eq!(d.backend, Backend::SelfHosted);
        assert_eq!(d.exposure, ExposureLevel::Full);
        assert!(d.reason.starts_with("fallback"));
    }

    #[test]
    fn fallback_never_widens_remote_exposure() {
        let r = router([Backend::ApiPremium].into_iter().collect());
        let context = QueryContext::new("q", "x", Sensitivity::Public, Complexity::Simple);
        let d = r.route(&context);
        assert_eq!(d.backend, Backend::ApiPremium);
        assert_eq!(d.exposure, ExposureLevel::SchemaOnly);
        assert!(d.reason.starts_with("fallback"));

        let internal = QueryContext::new("q", "x", Sensitivity::Internal, Complexity::Moderate);
        let d = r.route(&internal);
        assert_eq!(d.exposure, ExposureLevel::SchemaOnly);
    }

    #[test]
    fn route_to_checks_availability() {
        let r = router(Availability::all().without(Backend::SelfHosted));
        let context =
            QueryContext::new("q", "snowflake", Sensitivity::Internal, Complexity::Moderate);

        let d = r.route_to(&context, Backend::ApiBalanced).unwrap();
        assert_eq!(d.reason, "explicit backend");
        assert_eq!(d.exposure, ExposureLevel::Aggregated);

        let err = r.route_to(&context, Backend::SelfHosted).unwrap_err();
        assert_eq!(err.to_string(), "configuration error: backend self_hosted is not available");
    }

    #[test]
    fn quick_route_parses_names() {
        assert_eq!(
            quick_route("Top customers", "snowflake", "internal", "simple", false).unwrap(),
            "in_perimeter"
        );
        assert_eq!(
            quick_route("Churn drivers", "postgres", "confidential", "complex", false).unwrap(),
            "api_balanced"
        );
        assert_eq!(
            quick_route("Forecast", "postgres", "restricted", "complex", true).unwrap(),
            "self_hosted"
        );
        assert!(matches!(
            quick_route("q", "snowflake", "secret", "simple", false),
            Err(TiergateError::InvalidContext { field: "sensitivity", .. })
        ));
    }
}
