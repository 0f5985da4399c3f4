//! # Deferred Calls
//!
//! The scheduling capability behind label-reveal timers.
//!
//! The controller never sleeps or spawns. It hands a [`RevertTask`] to a
//! [`DeferredCall`] implementation, and whoever drives that implementation
//! hands the task back through `InteractionController::fire` once it is due.
//! That keeps every mutation on the controller's single logical thread: a
//! timer expiry is just one more queued event.
//!
//! [`VirtualScheduler`] is the in-crate implementation, driven by an explicit
//! virtual clock. Real-time drivers live in the binary.

use crate::NodeId;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Identifier of one scheduled revert. Never reused within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// The deferred action: put `original_label` back on `node`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertTask {
    pub timer: TimerId,
    pub node: NodeId,
    pub original_label: String,
}

/// A cancellable "call me back later" capability.
pub trait DeferredCall {
    /// Arrange for `task` to be delivered after `delay`.
    fn schedule(&mut self, delay: Duration, task: RevertTask);

    /// Make sure `timer` is never delivered.
    fn cancel(&mut self, timer: TimerId);

    /// Called by the controller once a delivered task has been applied.
    fn acknowledge(&mut self, _timer: TimerId) {}
}

// =============================================================================
// VIRTUAL SCHEDULER
// =============================================================================

/// A scheduler on a virtual clock that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct VirtualScheduler {
    now: Duration,
    /// Pending tasks keyed by (deadline, timer) so ties fire in schedule order.
    queue: BTreeMap<(Duration, TimerId), RevertTask>,
}

impl VirtualScheduler {
    /// Create a scheduler at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and return every task that became due,
    /// earliest deadline first.
    pub fn advance(&mut self, by: Duration) -> Vec<RevertTask> {
        self.now = self.now.saturating_add(by);
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    /// Deadline of the earliest pending task.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Number of tasks still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Check whether a timer is still waiting.
    #[must_use]
    pub fn is_pending(&self, timer: TimerId) -> bool {
        self.queue.keys().any(|(_, id)| *id == timer)
    }
}

impl DeferredCall for VirtualScheduler {
    fn schedule(&mut self, delay: Duration, task: RevertTask) {
        let deadline = self.now.saturating_add(delay);
        self.queue.insert((deadline, task.timer), task);
    }

    fn cancel(&mut self, timer: TimerId) {
        self.queue.retain(|(_, id), _| *id != timer);
    }
}
