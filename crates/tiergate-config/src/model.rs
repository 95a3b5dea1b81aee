// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};
use tiergate_core::Backend;

/// Top-level Tiergate configuration.
///
/// Every section is optional and defaults to a configuration where all five
/// backends are available at their table prices.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TiergateConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Policy engine settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Per-backend availability and pricing.
    #[serde(default)]
    pub backends: BackendsConfig,

    /// Telemetry retention and reporting.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Name used in log output.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "tiergate".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Policy engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Data-source identifier of the structured store the in-perimeter engine
    /// is colocated with. Queries against this source may use that engine.
    #[serde(default = "default_in_perimeter_source")]
    pub in_perimeter_source: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            in_perimeter_source: default_in_perimeter_source(),
        }
    }
}

fn default_in_perimeter_source() -> String {
    "snowflake".to_string()
}

/// Availability and price of a single backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Whether the backend may be chosen at all.
    #[serde(default = "default_backend_enabled")]
    pub enabled: bool,

    /// Price in USD per 1000 tokens. `None` uses the built-in table price.
    #[serde(default)]
    pub unit_cost_per_1k: Option<f64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: default_backend_enabled(),
            unit_cost_per_1k: None,
        }
    }
}

fn default_backend_enabled() -> bool {
    true
}

/// One `[backends.<name>]` table per execution tier.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendsConfig {
    #[serde(default)]
    pub in_perimeter: BackendConfig,
    #[serde(default)]
    pub self_hosted: BackendConfig,
    #[serde(default)]
    pub api_economy: BackendConfig,
    #[serde(default)]
    pub api_balanced: BackendConfig,
    #[serde(default)]
    pub api_premium: BackendConfig,
}

impl BackendsConfig {
    /// Settings for one backend.
    pub fn get(&self, backend: Backend) -> &BackendConfig {
        match backend {
            Backend::InPerimeter => &self.in_perimeter,
            Backend::SelfHosted => &self.self_hosted,
            Backend::ApiEconomy => &self.api_economy,
            Backend::ApiBalanced => &self.api_balanced,
            Backend::ApiPremium => &self.api_premium,
        }
    }

    /// Mutable settings for one backend.
    pub fn get_mut(&mut self, backend: Backend) -> &mut BackendConfig {
        match backend {
            Backend::InPerimeter => &mut self.in_perimeter,
            Backend::SelfHosted => &mut self.self_hosted,
            Backend::ApiEconomy => &mut self.api_economy,
            Backend::ApiBalanced => &mut self.api_balanced,
            Backend::ApiPremium => &mut self.api_premium,
        }
    }

    pub fn is_enabled(&self, backend: Backend) -> bool {
        self.get(backend).enabled
    }

    /// Effective price per 1000 tokens, falling back to the capability table.
    pub fn unit_cost_per_1k(&self, backend: Backend) -> f64 {
        self.get(backend)
            .unit_cost_per_1k
            .unwrap_or(backend.spec().default_unit_cost_per_1k)
    }
}

/// Telemetry retention and reporting configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Maximum query metrics kept in memory; oldest are evicted first.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Default horizon for cost forecasts, in days.
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            forecast_days: default_forecast_days(),
        }
    }
}

fn default_max_history() -> usize {
    10_000
}

fn default_forecast_days() -> u32 {
    30
}
