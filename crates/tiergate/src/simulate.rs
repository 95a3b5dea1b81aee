// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tiergate simulate` command implementation.
//!
//! Generates a seeded stream of query contexts, executes them through the
//! router against in-process simulated backends, then reports on the
//! resulting telemetry or exports it.

use std::io::IsTerminal;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use clap::Args;
use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use strum::IntoEnumIterator;
use tiergate_config::TiergateConfig;
use tiergate_core::{
    AdapterResponse, Backend, BackendAdapter, Complexity, QueryContext, RoutingDecision,
    Sensitivity, TiergateError,
};
use tiergate_router::Router;
use tiergate_telemetry::{export, ExportFormat, TelemetryStore};
use tracing::info;

use crate::report::{self, Report};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of queries to execute.
    #[arg(long, default_value_t = 200)]
    pub queries: usize,

    /// Seed for query generation and simulated backend behavior.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Print the telemetry log as json or csv instead of the report.
    #[arg(long)]
    pub export: Option<String>,

    /// Forecast horizon in days (defaults to telemetry.forecast_days).
    #[arg(long)]
    pub days: Option<u32>,

    /// Queries in flight at once.
    #[arg(long, default_value_t = 8)]
    pub concurrency: usize,

    /// Output the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Disable colors.
    #[arg(long)]
    pub plain: bool,
}

/// Latency range and failure probability of a simulated backend.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Profile {
    min_latency_ms: u64,
    max_latency_ms: u64,
    failure_rate: f64,
}

fn profile(backend: Backend) -> Profile {
    let (min_latency_ms, max_latency_ms, failure_rate) = match backend {
        Backend::InPerimeter => (4, 12, 0.02),
        Backend::SelfHosted => (8, 25, 0.05),
        Backend::ApiEconomy => (2, 6, 0.03),
        Backend::ApiBalanced => (5, 15, 0.04),
        Backend::ApiPremium => (10, 30, 0.06),
    };
    Profile {
        min_latency_ms,
        max_latency_ms,
        failure_rate,
    }
}

/// A backend that sleeps for a random latency and fails at a fixed rate.
pub struct SimulatedAdapter {
    backend: Backend,
    profile: Profile,
    rng: Mutex<StdRng>,
}

impl SimulatedAdapter {
    pub fn new(backend: Backend, seed: u64) -> Self {
        Self {
            backend,
            profile: profile(backend),
            rng: Mutex::new(StdRng::seed_from_u64(seed ^ ((backend as u64 + 1) << 32))),
        }
    }
}

#[async_trait]
impl BackendAdapter for SimulatedAdapter {
    fn backend(&self) -> Backend {
        self.backend
    }

    async fn invoke(
        &self,
        context: &QueryContext,
        decision: &RoutingDecision,
    ) -> Result<AdapterResponse, TiergateError> {
        let (latency_ms, fails, iterations, tokens) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            (
                rng.gen_range(self.profile.min_latency_ms..=self.profile.max_latency_ms),
                rng.gen_bool(self.profile.failure_rate),
                rng.gen_range(1..=context.iteration_budget()),
                rng.gen_range(300..=2500u32),
            )
        };

        tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        if fails {
            return Err(TiergateError::execution(
                self.backend,
                "simulated backend error",
            ));
        }
        Ok(AdapterResponse {
            payload: json!({
                "backend": self.backend,
                "exposure": decision.exposure,
                "simulated_latency_ms": latency_ms,
            }),
            iterations,
            tokens_used: Some(tokens),
        })
    }
}

const SENSITIVITIES: [Sensitivity; 4] = [
    Sensitivity::Public,
    Sensitivity::Internal,
    Sensitivity::Confidential,
    Sensitivity::Restricted,
];

const COMPLEXITIES: [Complexity; 3] = [
    Complexity::Simple,
    Complexity::Moderate,
    Complexity::Complex,
];

/// `n` reproducible query contexts for `seed`.
pub fn generate_contexts(n: usize, seed: u64, in_perimeter_source: &str) -> Vec<QueryContext> {
    let mut rng = StdRng::seed_from_u64(seed);
    let sources = [in_perimeter_source, "postgres", "bigquery"];
    let preferences: Vec<Backend> = Backend::iter().collect();

    (0..n)
        .map(|i| {
            let sensitivity = SENSITIVITIES[rng.gen_range(0..SENSITIVITIES.len())];
            let complexity = COMPLEXITIES[rng.gen_range(0..COMPLEXITIES.len())];
            let source = sources[rng.gen_range(0..sources.len())];
            let tokens = if rng.gen_bool(0.25) {
                0
            } else {
                rng.gen_range(200..=4000)
            };
            let mut context = QueryContext::new(
                format!("simulated {complexity} question #{i}"),
                source,
                sensitivity,
                complexity,
            )
            .with_iteration(rng.gen_bool(0.3))
            .with_estimated_tokens(tokens);
            if rng.gen_bool(0.05) {
                context = context.with_preference(preferences[rng.gen_range(0..preferences.len())]);
            }
            context
        })
        .collect()
}

/// Execute `queries` generated contexts and return the populated store.
pub async fn simulate(
    config: &TiergateConfig,
    queries: usize,
    seed: u64,
    concurrency: usize,
) -> Result<Arc<TelemetryStore>, TiergateError> {
    let store = Arc::new(TelemetryStore::from_config(&config.telemetry));
    let adapters = Backend::iter()
        .map(|backend| Arc::new(SimulatedAdapter::new(backend, seed)) as Arc<dyn BackendAdapter>);
    let router = Router::with_adapters(config, adapters, Arc::clone(&store))?;

    let contexts = generate_contexts(queries, seed, &config.router.in_perimeter_source);
    let succeeded = stream::iter(contexts.iter())
        .map(|context| router.execute(context))
        .buffer_unordered(concurrency.max(1))
        .filter(|outcome| futures::future::ready(outcome.success()))
        .count()
        .await;

    info!(queries, succeeded, seed, "simulation finished");
    Ok(store)
}

/// Run the `tiergate simulate` command.
pub async fn run_simulate(
    config: &TiergateConfig,
    args: &SimulateArgs,
) -> Result<(), TiergateError> {
    // Reject a bad format before doing any work or printing anything.
    let format = args.export.as_deref().map(ExportFormat::parse).transpose()?;

    let store = simulate(config, args.queries, args.seed, args.concurrency).await?;

    if let Some(format) = format {
        let rendered = export(&store.snapshot(), format)?;
        println!("{}", rendered.trim_end());
        return Ok(());
    }

    let days = args.days.unwrap_or(config.telemetry.forecast_days);
    let report = Report::collect(&store, days);
    if args.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| TiergateError::Internal(format!("failed to render report: {e}")))?;
        println!("{rendered}");
    } else {
        let use_color = !args.plain && std::io::stdout().is_terminal();
        report::print_report(&report, use_color);
    }
    Ok(())
}
