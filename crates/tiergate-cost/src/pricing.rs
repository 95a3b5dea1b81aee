// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend unit prices and cost estimation.
//!
//! Default prices per 1000 tokens:
//!
//! in_perimeter 0.003 (warehouse credits), self_hosted 0.001 (amortized
//! hardware), api_economy 0.0003, api_balanced 0.003, api_premium 0.015.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tiergate_config::model::BackendsConfig;
use tiergate_core::{Backend, BACKEND_COUNT, BACKEND_TABLE, DEFAULT_TOKEN_ESTIMATE};

/// Price in USD per 1000 tokens for every backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    per_1k: [f64; BACKEND_COUNT],
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            per_1k: BACKEND_TABLE.map(|spec| spec.default_unit_cost_per_1k),
        }
    }
}

impl PriceTable {
    /// Table prices with any configured overrides applied.
    ///
    /// Negative or non-finite overrides are clamped to zero so estimates stay
    /// non-negative even if validation was skipped.
    pub fn from_config(backends: &BackendsConfig) -> Self {
        let mut table = Self::default();
        for backend in Backend::iter() {
            let price = backends.unit_cost_per_1k(backend);
            table.per_1k[backend as usize] = if price.is_finite() { price.max(0.0) } else { 0.0 };
        }
        table
    }

    /// Price per 1000 tokens for one backend.
    pub fn unit_cost(&self, backend: Backend) -> f64 {
        self.per_1k[backend as usize]
    }

    /// Estimated cost of sending `tokens` tokens to `backend`.
    ///
    /// A zero token count means "unknown" and is costed as
    /// [`DEFAULT_TOKEN_ESTIMATE`] tokens.
    pub fn estimate(&self, backend: Backend, tokens: u32) -> f64 {
        let tokens = if tokens == 0 { DEFAULT_TOKEN_ESTIMATE } else { tokens };
        (f64::from(tokens) / 1000.0) * self.unit_cost(backend)
    }
}

/// Estimate cost with the default price table.
pub fn estimate_cost(backend: Backend, tokens: u32) -> f64 {
    PriceTable::default().estimate(backend, tokens)
}
