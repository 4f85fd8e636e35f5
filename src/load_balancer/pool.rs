//! Backend pool.
//!
//! # Responsibilities
//! - Hold the fixed, ordered set of backends
//! - Own the rotation cursor shared by every concurrent request
//! - Select the next alive backend in round-robin order

use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

use crate::load_balancer::Backend;

/// A pool needs at least one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("backend pool requires at least one member")]
pub struct EmptyPool;

/// Every member failed the liveness check during one full sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no backend available ({probed} members probed)")]
pub struct NoBackendAvailable {
    pub probed: usize,
}

/// Ordered, immutable set of backends plus a round-robin cursor.
#[derive(Debug)]
pub struct BackendPool<B> {
    members: Vec<B>,
    cursor: AtomicUsize,
}

impl<B: Backend> BackendPool<B> {
    /// Create a pool. Membership is fixed from here on.
    pub fn new(members: Vec<B>) -> Result<Self, EmptyPool> {
        if members.is_empty() {
            return Err(EmptyPool);
        }
        Ok(Self {
            members,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Select the next alive backend.
    ///
    /// Each probe takes one ticket from the cursor, so a dead member costs
    /// its slot and the remaining members keep their relative order. At most
    /// `len()` probes are made before giving up.
    pub fn next(&self) -> Result<&B, NoBackendAvailable> {
        let len = self.members.len();

        for _ in 0..len {
            let ticket = self.cursor.fetch_add(1, Ordering::Relaxed);
            let backend = &self.members[ticket % len];
            if backend.is_alive() {
                return Ok(backend);
            }
            tracing::trace!(backend = backend.address(), "Skipping backend that is not alive");
        }

        tracing::warn!(members = len, "No alive backend after a full sweep");
        Err(NoBackendAvailable { probed: len })
    }

    pub fn members(&self) -> &[B] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; a pool cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.members.iter().filter(|b| b.is_alive()).count()
    }

    /// Total tickets handed out so far.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}
