// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits implemented outside the policy engine.
//!
//! Execution tiers implement [`BackendAdapter`] with `#[async_trait]` so the
//! router can hold them as `Arc<dyn BackendAdapter>` and address them generically.

pub mod adapter;

pub use adapter::{AdapterResponse, BackendAdapter};
