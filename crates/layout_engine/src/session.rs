//! Render sessions and stale-write prevention
//!
//! Each new input starts a render with `RenderSession::begin`, which
//! supersedes every ticket issued before it. Layout passes check their ticket
//! after each suspension point and abandon the page when it has gone stale.

use crate::{LayoutError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared generation counter for the renders targeting one output
#[derive(Debug, Clone, Default)]
pub struct RenderSession {
    generation: Arc<AtomicU64>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new render, superseding all earlier tickets
    pub fn begin(&self) -> RenderTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        RenderTicket {
            generation,
            current: Arc::clone(&self.generation),
        }
    }

    /// Supersede all outstanding tickets without starting a new render
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

/// Permission for one render to write its results
#[derive(Debug, Clone)]
pub struct RenderTicket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RenderTicket {
    /// A ticket that can never be superseded
    pub fn detached() -> Self {
        RenderSession::new().begin()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.generation
    }

    /// Fail with `LayoutError::Cancelled` once a newer render has started
    pub fn ensure_current(&self) -> Result<()> {
        if self.is_current() {
            Ok(())
        } else {
            tracing::debug!("Render generation {} superseded", self.generation);
            Err(LayoutError::Cancelled)
        }
    }
}
