//! Single-flight guard for post-processing passes.
//!
//! Rapid upstream events (new capture, resize, query edits, language switch)
//! can trigger a pass while another is running. The gate resolves this with
//! two rules:
//!
//! - every request takes a [`RequestToken`]; a newer request makes older tokens
//!   stale, and a stale pass throws its result away instead of committing it
//! - at most one pass holds the [`PassGuard`]; a request arriving while the
//!   guard is held is dropped rather than queued

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct InferenceGate {
    busy: AtomicBool,
    generation: AtomicU64,
}

/// Identifies one request; compare with [`InferenceGate::is_current`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
}

/// Held while a pass runs; releases the gate on drop.
#[derive(Debug)]
pub struct PassGuard<'a> {
    gate: &'a InferenceGate,
}

impl InferenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, invalidating every earlier token.
    pub fn request(&self) -> RequestToken {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        RequestToken { generation }
    }

    /// Invalidates outstanding tokens without starting a request.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Token of the latest request.
    pub fn current(&self) -> RequestToken {
        RequestToken {
            generation: self.generation.load(Ordering::Acquire),
        }
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.generation.load(Ordering::Acquire) == token.generation
    }

    /// Claims the gate, or returns `None` when another pass holds it.
    pub fn try_enter(&self) -> Option<PassGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PassGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
