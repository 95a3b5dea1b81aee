// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Tiergate, the backend-selection policy engine.
//!
//! This crate provides the closed categories every other crate routes on
//! (sensitivity, complexity, backend, exposure level), the static backend
//! capability table, the per-request [`QueryContext`] and [`RoutingDecision`]
//! types, the shared [`TiergateError`] taxonomy, and the [`BackendAdapter`]
//! trait that execution tiers implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TiergateError;
pub use traits::{AdapterResponse, BackendAdapter};
pub use types::{
    Backend, BackendSpec, Complexity, ExposureLevel, Placement, QueryContext, RoutingDecision,
    Sensitivity, BACKEND_COUNT, BACKEND_TABLE, DEFAULT_TOKEN_ESTIMATE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiergate_error_has_all_variants() {
        let _invalid = TiergateError::InvalidContext {
            field: "sensitivity",
            value: "secret".into(),
        };
        let _config = TiergateError::Configuration("test".into());
        let _exec = TiergateError::Execution {
            backend: Backend::ApiPremium,
            message: "test".into(),
            source: None,
        };
        let _format = TiergateError::UnsupportedExportFormat("xml".into());
        let _export = TiergateError::Export {
            source: Box::new(std::io::Error::other("test")),
        };
        let _data = TiergateError::InsufficientData { needed: 2, have: 0 };
        let _internal = TiergateError::Internal("test".into());
    }

    #[test]
    fn backend_table_covers_every_backend() {
        use strum::IntoEnumIterator;

        for backend in Backend::iter() {
            assert_eq!(backend.spec().backend, backend);
        }
        assert_eq!(BACKEND_TABLE.len(), Backend::iter().count());
        assert_eq!(BACKEND_COUNT, Backend::iter().count());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_backend_adapter<T: BackendAdapter>() {}
    }
}
