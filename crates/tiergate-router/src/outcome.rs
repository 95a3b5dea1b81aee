// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution results handed back to the serving layer.

use std::time::Duration;

use tiergate_core::{AdapterResponse, RoutingDecision, TiergateError};

/// Optional caller identifiers recorded with the query metric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionTags {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

impl ExecutionTags {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// What happened when a query was dispatched.
///
/// Adapter failures land in `result`; they are never propagated as errors
/// from `execute`.
#[derive(Debug)]
pub struct ExecutionOutcome {
    pub routing: RoutingDecision,
    pub result: Result<AdapterResponse, TiergateError>,
    pub latency: Duration,
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn response(&self) -> Option<&AdapterResponse> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&TiergateError> {
        self.result.as_ref().err()
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency.as_secs_f64() * 1000.0
    }
}
