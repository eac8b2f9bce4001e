use std::cell::{Cell, RefCell};

use crate::render::composite::CompositeInputs;

/// A pass waiting for the next frame, stamped with the generation it was scheduled under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledPass {
    pub generation: u64,
    pub inputs: CompositeInputs,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SchedulerStats {
    /// Schedule requests that produced a new generation.
    pub scheduled: u64,
    /// Pending passes replaced before they ran.
    pub coalesced: u64,
    /// Passes that finished loading after a newer schedule and were discarded.
    pub superseded: u64,
    /// Passes whose result landed in the buffer.
    pub committed: u64,
}

/// At most one pending composite pass, guarded by a generation counter.
///
/// Every schedule bumps the generation and replaces (cancels) whatever was pending. A pass that
/// is already running captured its generation at start and must check [`is_current`] after its
/// load phase; a mismatch means a newer schedule exists and its result must be dropped.
///
/// Interior mutability lets the store observer and the controller share one scheduler.
///
/// [`is_current`]: PassScheduler::is_current
#[derive(Debug, Default)]
pub struct PassScheduler {
    generation: Cell<u64>,
    pending: Cell<Option<ScheduledPass>>,
    last_inputs: Cell<Option<CompositeInputs>>,
    closed: Cell<bool>,
    stats: RefCell<SchedulerStats>,
}

impl PassScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a pass for `inputs` unless the same tuple was the last one scheduled.
    ///
    /// Returns the new generation, or `None` when nothing was scheduled.
    pub fn schedule(&self, inputs: CompositeInputs) -> Option<u64> {
        if self.last_inputs.get() == Some(inputs) {
            tracing::trace!(?inputs, "composite inputs unchanged; not scheduling");
            return None;
        }
        self.schedule_always(inputs)
    }

    /// Schedule even when `inputs` did not change (first paint after mount).
    pub fn schedule_always(&self, inputs: CompositeInputs) -> Option<u64> {
        if self.closed.get() {
            return None;
        }
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.last_inputs.set(Some(inputs));

        let mut stats = self.stats.borrow_mut();
        stats.scheduled += 1;
        if let Some(cancelled) = self.pending.replace(Some(ScheduledPass { generation, inputs })) {
            stats.coalesced += 1;
            tracing::debug!(
                cancelled = cancelled.generation,
                generation,
                "pending composite replaced"
            );
        } else {
            tracing::debug!(generation, "composite scheduled");
        }
        Some(generation)
    }

    /// Take the pending pass, if any. After this the pass is in flight.
    pub fn take_due(&self) -> Option<ScheduledPass> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// True when no newer schedule happened since `generation` was handed out.
    pub fn is_current(&self, generation: u64) -> bool {
        !self.closed.get() && self.generation.get() == generation
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub(crate) fn note_superseded(&self, generation: u64) {
        self.stats.borrow_mut().superseded += 1;
        tracing::debug!(
            generation,
            current = self.generation.get(),
            "stale composite discarded"
        );
    }

    pub(crate) fn note_committed(&self) {
        self.stats.borrow_mut().committed += 1;
    }

    /// Drop anything pending, invalidate in-flight passes and refuse further schedules.
    pub fn close(&self) {
        if self.closed.replace(true) {
            return;
        }
        self.generation.set(self.generation.get() + 1);
        if self.pending.take().is_some() {
            tracing::debug!("pending composite cancelled at shutdown");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn stats(&self) -> SchedulerStats {
        *self.stats.borrow()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/scheduler.rs"]
mod tests;
