// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend-selection policy engine for Tiergate.
//!
//! [`Router::route`] maps a [`QueryContext`](tiergate_core::QueryContext) to a
//! [`RoutingDecision`](tiergate_core::RoutingDecision) by walking an ordered
//! list of rules; [`Router::execute`] dispatches the decision to the matching
//! backend adapter and records the outcome in the telemetry store.

pub mod availability;
pub mod outcome;
pub mod router;
pub mod rules;

pub use availability::Availability;
pub use outcome::{ExecutionOutcome, ExecutionTags};
pub use router::{quick_route, Router};
pub use rules::{exposure_for, Rule, RoutingInput, Verdict, RULES};
