// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every Tiergate crate.

use thiserror::Error;

use crate::types::Backend;

/// The primary error type used across routing, execution, telemetry and export.
#[derive(Debug, Error)]
pub enum TiergateError {
    /// A context field carried an unknown sensitivity, complexity or backend name.
    /// Raised at context construction, never by the router.
    #[error("invalid query context: unknown {field} `{value}`")]
    InvalidContext { field: &'static str, value: String },

    /// A backend was requested that is not configured or not available.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A backend adapter failed while answering a query.
    #[error("execution failed on {backend}: {message}")]
    Execution {
        backend: Backend,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An export format other than `json` or `csv` was requested.
    #[error("unsupported export format `{0}` (expected json or csv)")]
    UnsupportedExportFormat(String),

    /// Serializing the telemetry log failed.
    #[error("export error: {source}")]
    Export {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Not enough telemetry history for the requested analysis.
    #[error("insufficient data: need at least {needed} samples, have {have}")]
    InsufficientData { needed: usize, have: usize },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TiergateError {
    /// Convenience constructor for adapter failures without an underlying cause.
    pub fn execution(backend: Backend, message: impl Into<String>) -> Self {
        Self::Execution {
            backend,
            message: message.into(),
            source: None,
        }
    }
}
