// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-tier backend availability set.

use std::fmt;

use strum::IntoEnumIterator;
use tiergate_config::model::BackendsConfig;
use tiergate_core::{Backend, BACKEND_COUNT};

/// Which backends may be chosen. Fixed for the lifetime of a router.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    flags: [bool; BACKEND_COUNT],
}

impl Availability {
    /// Every backend available.
    pub fn all() -> Self {
        Self {
            flags: [true; BACKEND_COUNT],
        }
    }

    /// No backend available.
    pub fn none() -> Self {
        Self::default()
    }

    /// Backends enabled in `[backends.<name>]`.
    pub fn from_config(backends: &BackendsConfig) -> Self {
        Backend::iter()
            .filter(|b| backends.is_enabled(*b))
            .collect()
    }

    pub fn contains(&self, backend: Backend) -> bool {
        self.flags[backend as usize]
    }

    pub fn insert(&mut self, backend: Backend) {
        self.flags[backend as usize] = true;
    }

    pub fn remove(&mut self, backend: Backend) {
        self.flags[backend as usize] = false;
    }

    /// Copy without `backend`.
    pub fn without(mut self, backend: Backend) -> Self {
        self.remove(backend);
        self
    }

    /// Backends present in both sets.
    pub fn intersect(self, other: Availability) -> Self {
        self.iter().filter(|b| other.contains(*b)).collect()
    }

    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|f| *f)
    }

    /// Available backends in table order.
    pub fn iter(&self) -> impl Iterator<Item = Backend> + '_ {
        Backend::iter().filter(|b| self.contains(*b))
    }
}

impl FromIterator<Backend> for Availability {
    fn from_iter<I: IntoIterator<Item = Backend>>(iter: I) -> Self {
        let mut set = Self::none();
        for backend in iter {
            set.insert(backend);
        }
        set
    }
}

impl fmt::Debug for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
