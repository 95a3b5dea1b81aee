// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uniform invocation capability for execution tiers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TiergateError;
use crate::types::{Backend, QueryContext, RoutingDecision};

/// What an adapter hands back after answering a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterResponse {
    /// Backend-specific result payload (generated code, rows, commentary).
    pub payload: serde_json::Value,
    /// Refinement rounds actually spent, at least 1.
    pub iterations: u32,
    /// Tokens actually consumed, when the backend reports them.
    pub tokens_used: Option<u32>,
}

impl AdapterResponse {
    /// A single-pass response with no token accounting.
    pub fn single(payload: serde_json::Value) -> Self {
        Self {
            payload,
            iterations: 1,
            tokens_used: None,
        }
    }
}

/// One execution tier (in-perimeter engine, self-hosted model or remote API).
///
/// Adapters own their network calls, timeouts and refinement loops; the
/// router only chooses which adapter to call and records what happened.
#[async_trait]
pub trait BackendAdapter: Send + Sync + 'static {
    /// The backend this adapter serves.
    fn backend(&self) -> Backend;

    /// Answer the query under the exposure level carried by `decision`.
    async fn invoke(
        &self,
        context: &QueryContext,
        decision: &RoutingDecision,
    ) -> Result<AdapterResponse, TiergateError>;
}
