// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight work gate with a post-work delay

use std::time::{Duration, Instant};

/// Ensures an owner has at most one piece of work in flight and that the
/// next piece waits out the delay chosen when the previous one finished.
#[derive(Debug, Clone, Default)]
pub struct WorkSlot {
    working: bool,
    ready_at: Option<Instant>,
}

impl WorkSlot {
    /// Claim the slot. Returns false while busy or still delayed.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.working = true;
        true
    }

    /// Release the slot; the next `try_begin` succeeds once `delay` has elapsed.
    pub fn finish(&mut self, now: Instant, delay: Duration) {
        self.working = false;
        self.ready_at = Some(now + delay);
    }

    pub fn is_working(&self) -> bool {
        self.working
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        !self.working && self.ready_at.is_none_or(|at| now >= at)
    }
}

#[cfg(test)]
#[path = "work_tests.rs"]
mod tests;
