//! Scheduled scene advances.

use tokio::time::Instant;

/// An advance queued by `next_dialogue`, tagged with the scene generation
/// that was current when it was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAdvance {
    /// When the advance becomes due.
    pub due: Instant,
    /// Generation that scheduled it.
    pub generation: u64,
}

/// Pending advances, fired by the host.
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: Vec<ScheduledAdvance>,
}

impl TimerQueue {
    /// Queues an advance.
    pub fn schedule(&mut self, advance: ScheduledAdvance) {
        self.pending.push(advance);
    }

    /// Earliest due time among advances still belonging to `generation`.
    #[must_use]
    pub fn next_deadline(&self, generation: u64) -> Option<Instant> {
        self.pending
            .iter()
            .filter(|a| a.generation == generation)
            .map(|a| a.due)
            .min()
    }

    /// Removes and returns every advance due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<ScheduledAdvance> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|a| a.due <= now);
        self.pending = pending;
        due.sort_by_key(|a| a.due);
        due
    }

    /// Drops every advance not belonging to `generation`.
    pub fn retain_generation(&mut self, generation: u64) {
        self.pending.retain(|a| a.generation == generation);
    }

    /// Number of queued advances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
