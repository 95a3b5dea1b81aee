// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end routing and execution tests.
//!
//! `TestHarness` assembles a router with one [`MockAdapter`] per available
//! backend and a fresh telemetry store.

use std::collections::HashMap;
use std::sync::Arc;

use tiergate_config::TiergateConfig;
use tiergate_core::{Backend, BackendAdapter, TiergateError};
use tiergate_router::Router;
use tiergate_telemetry::TelemetryStore;

use crate::mock_adapter::{MockAdapter, MockOutcome};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: TiergateConfig,
    backends: Vec<Backend>,
    scripts: HashMap<Backend, Vec<MockOutcome>>,
    capacity: usize,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: TiergateConfig::default(),
            backends: vec![
                Backend::InPerimeter,
                Backend::SelfHosted,
                Backend::ApiEconomy,
                Backend::ApiBalanced,
                Backend::ApiPremium,
            ],
            scripts: HashMap::new(),
            capacity: 1000,
        }
    }

    /// Register mock adapters only for these backends.
    pub fn with_backends(mut self, backends: &[Backend]) -> Self {
        self.backends = backends.to_vec();
        self
    }

    /// Use this configuration instead of the defaults.
    pub fn with_config(mut self, config: TiergateConfig) -> Self {
        self.config = config;
        self
    }

    /// Script the outcomes of one backend's adapter.
    pub fn with_script(mut self, backend: Backend, script: Vec<MockOutcome>) -> Self {
        self.scripts.insert(backend, script);
        self
    }

    /// Telemetry store capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build the harness.
    pub fn build(mut self) -> Result<TestHarness, TiergateError> {
        let adapters: HashMap<Backend, Arc<MockAdapter>> = self
            .backends
            .iter()
            .map(|&backend| {
                let script = self.scripts.remove(&backend).unwrap_or_default();
                (backend, Arc::new(MockAdapter::with_script(backend, script)))
            })
            .collect();

        let store = Arc::new(TelemetryStore::new(self.capacity));
        let router = Router::with_adapters(
            &self.config,
            adapters
                .values()
                .map(|a| Arc::clone(a) as Arc<dyn BackendAdapter>),
            Arc::clone(&store),
        )?;

        Ok(TestHarness {
            router,
            store,
            adapters,
        })
    }
}

/// A router wired to mock adapters.
pub struct TestHarness {
    pub router: Router,
    pub store: Arc<TelemetryStore>,
    pub adapters: HashMap<Backend, Arc<MockAdapter>>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The mock adapter registered for `backend`.
    pub fn adapter(&self, backend: Backend) -> Option<&Arc<MockAdapter>> {
        self.adapters.get(&backend)
    }

    /// Total `invoke` calls across all adapters.
    pub fn total_calls(&self) -> usize {
        self.adapters.values().map(|a| a.call_count()).sum()
    }
}
