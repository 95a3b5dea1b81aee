// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend adapter for deterministic testing.
//!
//! `MockAdapter` implements `BackendAdapter` with a scripted queue of
//! outcomes. When the queue is empty it answers with a single-pass success.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use tiergate_core::{
    AdapterResponse, Backend, BackendAdapter, QueryContext, RoutingDecision, TiergateError,
};

/// One scripted adapter reply.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    Success(AdapterResponse),
    Failure(String),
}

impl MockOutcome {
    /// Success with `iterations` rounds and `tokens` reported tokens.
    pub fn ok(iterations: u32, tokens: Option<u32>) -> Self {
        Self::Success(AdapterResponse {
            payload: json!({ "rows": [] }),
            iterations,
            tokens_used: tokens,
        })
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}

/// A backend adapter that replays scripted outcomes.
pub struct MockAdapter {
    backend: Backend,
    script: Mutex<VecDeque<MockOutcome>>,
    decisions: Mutex<Vec<RoutingDecision>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockAdapter {
    /// Create a mock adapter with an empty script.
    pub fn new(backend: Backend) -> Self {
        Self::with_script(backend, Vec::new())
    }

    /// Create a mock adapter pre-loaded with outcomes, replayed in order.
    pub fn with_script(backend: Backend, script: Vec<MockOutcome>) -> Self {
        Self {
            backend,
            script: Mutex::new(VecDeque::from(script)),
            decisions: Mutex::new(Vec::new()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep this long before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Append an outcome to the script.
    pub async fn push(&self, outcome: MockOutcome) {
        self.script.lock().await.push_back(outcome);
    }

    /// Number of times `invoke` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every routing decision this adapter was invoked with.
    pub async fn decisions(&self) -> Vec<RoutingDecision> {
        self.decisions.lock().await.clone()
    }
}

#[async_trait]
impl BackendAdapter for MockAdapter {
    fn backend(&self) -> Backend {
        self.backend
    }

    async fn invoke(
        &self,
        context: &QueryContext,
        decision: &RoutingDecision,
    ) -> Result<AdapterResponse, TiergateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.decisions.lock().await.push(decision.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().await.pop_front();
        match next {
            Some(MockOutcome::Success(response)) => Ok(response),
            Some(MockOutcome::Failure(message)) => {
                Err(TiergateError::execution(self.backend, message))
            }
            None => Ok(AdapterResponse::single(json!({
                "backend": self.backend,
                "question": context.question,
            }))),
        }
    }
}
