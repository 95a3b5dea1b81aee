// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed routing categories, the backend capability table, and the
//! per-request context and decision types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

use crate::error::TiergateError;

/// Token count assumed for costing when a context carries no estimate.
pub const DEFAULT_TOKEN_ESTIMATE: u32 = 1000;

/// How restricted the data behind a query is. Ordered from least to most restricted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    /// Open data, no restrictions.
    Public,
    /// Company internal, not personal data.
    Internal,
    /// Personal or financial data.
    Confidential,
    /// Regulated data.
    Restricted,
}

impl Sensitivity {
    /// Confidential and restricted data may not leave the perimeter in full.
    pub fn is_sensitive(self) -> bool {
        self >= Sensitivity::Confidential
    }
}

/// Estimated analytical complexity of a query.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Single table, basic aggregation.
    Simple,
    /// Joins, window functions.
    Moderate,
    /// Multi-step analysis.
    Complex,
}

/// An execution tier that can answer a query.
///
/// Variant order must match the rows of [`BACKEND_TABLE`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Compute colocated with the structured data store.
    InPerimeter,
    /// Self-hosted model inside the trust boundary.
    SelfHosted,
    /// Cheapest remote API tier.
    ApiEconomy,
    /// Mid-tier remote API, balanced accuracy and cost.
    ApiBalanced,
    /// Highest-accuracy remote API tier.
    ApiPremium,
}

/// Where a backend runs relative to the data's trust boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    InPerimeter,
    SelfHosted,
    RemoteApi,
}

/// Static capabilities of one backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackendSpec {
    pub backend: Backend,
    pub placement: Placement,
    /// May observe full query results without data leaving the perimeter.
    pub full_data_capable: bool,
    /// Counted as an expensive choice for simple queries.
    pub premium_priced: bool,
    /// Default price in USD per 1000 tokens.
    pub default_unit_cost_per_1k: f64,
}

/// Number of backends; sizes every per-backend array.
pub const BACKEND_COUNT: usize = <Backend as EnumCount>::COUNT;

/// Capability table. Adding a backend means adding a variant and a row here.
pub static BACKEND_TABLE: [BackendSpec; BACKEND_COUNT] = [
    BackendSpec {
        backend: Backend::InPerimeter,
        placement: Placement::InPerimeter,
        full_data_capable: true,
        premium_priced: false,
        default_unit_cost_per_1k: 0.003,
    },
    BackendSpec {
        backend: Backend::SelfHosted,
        placement: Placement::SelfHosted,
        full_data_capable: true,
        premium_priced: false,
        default_unit_cost_per_1k: 0.001,
    },
    BackendSpec {
        backend: Backend::ApiEconomy,
        placement: Placement::RemoteApi,
        full_data_capable: false,
        premium_priced: false,
        default_unit_cost_per_1k: 0.0003,
    },
    BackendSpec {
        backend: Backend::ApiBalanced,
        placement: Placement::RemoteApi,
        full_data_capable: false,
        premium_priced: true,
        default_unit_cost_per_1k: 0.003,
    },
    BackendSpec {
        backend: Backend::ApiPremium,
        placement: Placement::RemoteApi,
        full_data_capable: false,
        premium_priced: true,
        default_unit_cost_per_1k: 0.015,
    },
];

impl Backend {
    /// Look up this backend's row in the capability table.
    pub fn spec(self) -> &'static BackendSpec {
        &BACKEND_TABLE[self as usize]
    }

    pub fn is_full_data_capable(self) -> bool {
        self.spec().full_data_capable
    }

    pub fn is_remote_api(self) -> bool {
        self.spec().placement == Placement::RemoteApi
    }

    pub fn is_premium_priced(self) -> bool {
        self.spec().premium_priced
    }

    /// Remote API tier for a given complexity when data may only be described,
    /// not shown: complex work goes to the mid tier, everything else to the cheapest.
    pub fn schema_only_tier(complexity: Complexity) -> Backend {
        match complexity {
            Complexity::Complex => Backend::ApiBalanced,
            Complexity::Simple | Complexity::Moderate => Backend::ApiEconomy,
        }
    }
}

/// How much of the underlying query result a backend may observe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ExposureLevel {
    None,
    SchemaOnly,
    Aggregated,
    Full,
}

macro_rules! impl_context_parse {
    ($ty:ty, $field:literal) => {
        impl $ty {
            /// Parse a name, mapping unknown values to [`TiergateError::InvalidContext`].
            pub fn parse(value: &str) -> Result<Self, TiergateError> {
                <$ty>::from_str(value.trim()).map_err(|_| TiergateError::InvalidContext {
                    field: $field,
                    value: value.to_string(),
                })
            }
        }
    };
}

impl_context_parse!(Sensitivity, "sensitivity");
impl_context_parse!(Complexity, "complexity");
impl_context_parse!(Backend, "backend");

/// Everything the router needs to know about one incoming query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Natural-language question.
    pub question: String,
    /// Identifier of the data source the question targets.
    pub data_source: String,
    pub sensitivity: Sensitivity,
    pub complexity: Complexity,
    /// Whether answering requires iterative refinement against query results.
    pub requires_iteration: bool,
    /// Estimated token count, 0 when unknown.
    pub estimated_tokens: u32,
    /// Explicit backend requested by the caller.
    pub preference: Option<Backend>,
}

impl QueryContext {
    /// Create a context with no iteration, unknown token count and no preference.
    pub fn new(
        question: impl Into<String>,
        data_source: impl Into<String>,
        sensitivity: Sensitivity,
        complexity: Complexity,
    ) -> Self {
        Self {
            question: question.into(),
            data_source: data_source.into(),
            sensitivity,
            complexity,
            requires_iteration: false,
            estimated_tokens: 0,
            preference: None,
        }
    }

    /// Build a context from raw category names, as received from a request body.
    pub fn parse(
        question: &str,
        data_source: &str,
        sensitivity: &str,
        complexity: &str,
        requires_iteration: bool,
    ) -> Result<Self, TiergateError> {
        Ok(Self::new(
            question,
            data_source,
            Sensitivity::parse(sensitivity)?,
            Complexity::parse(complexity)?,
        )
        .with_iteration(requires_iteration))
    }

    pub fn with_iteration(mut self, requires_iteration: bool) -> Self {
        self.requires_iteration = requires_iteration;
        self
    }

    pub fn with_estimated_tokens(mut self, tokens: u32) -> Self {
        self.estimated_tokens = tokens;
        self
    }

    pub fn with_preference(mut self, backend: Backend) -> Self {
        self.preference = Some(backend);
        self
    }

    /// Token count used for costing; unknown estimates count as [`DEFAULT_TOKEN_ESTIMATE`].
    pub fn costing_tokens(&self) -> u32 {
        if self.estimated_tokens == 0 {
            DEFAULT_TOKEN_ESTIMATE
        } else {
            self.estimated_tokens
        }
    }

    /// Refinement rounds an adapter may spend on this query.
    pub fn iteration_budget(&self) -> u32 {
        if self.requires_iteration { 3 } else { 1 }
    }
}

/// Outcome of one `route()` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub backend: Backend,
    /// Human-readable explanation of why this backend was chosen.
    pub reason: String,
    /// Estimated cost in USD, never negative.
    pub estimated_cost: f64,
    pub exposure: ExposureLevel,
}
