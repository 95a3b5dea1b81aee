// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost model for Tiergate.
//!
//! A fixed unit-price table per backend, seeded from the capability table and
//! optionally overridden by `[backends.<name>].unit_cost_per_1k`, used to turn
//! a token estimate into an estimated USD cost.

pub mod pricing;

pub use pricing::{estimate_cost, PriceTable};
