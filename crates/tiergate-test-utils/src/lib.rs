// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tiergate integration tests.
//!
//! Provides mock backend adapters, query-metric fixtures and a harness that
//! wires them into a router, for fast, deterministic tests without live
//! backends.
//!
//! # Components
//!
//! - [`MockAdapter`] - Scripted backend adapter with call counting
//! - [`MetricFixture`] - Builder for [`QueryMetric`](tiergate_telemetry::QueryMetric) records
//! - [`TestHarness`] - Router plus one mock adapter per available backend

pub mod fixtures;
pub mod harness;
pub mod mock_adapter;

pub use fixtures::MetricFixture;
pub use harness::TestHarness;
pub use mock_adapter::{MockAdapter, MockOutcome};
