//! Change Scheduler
//!
//! Coalesces mutation bursts into at most one normalization pass per
//! animation frame.
//!
//! ```text
//!   idle --qualifying mutation--> scheduled --frame--> (pass) --> idle
//!                                   |    ^
//!                                   +----+ further mutations coalesce
//! ```
//!
//! The pass's own `role` writes come back as qualifying mutations and
//! schedule one more frame. That pass is a no-op by idempotence, writes
//! nothing, and the scheduler stays idle afterwards.

use looparia_dom::{DomTree, MutationObserverInit, MutationRecord, MutationType};

/// Attributes whose changes can invalidate a normalized tree
pub const WATCHED_ATTRIBUTES: [&str; 1] = ["role"];

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled,
}

/// What the scheduler wants done after a batch of records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// Nothing in the batch qualified
    Ignored,
    /// Request an animation frame callback
    RequestFrame,
    /// A pass is already pending and covers this batch
    Coalesced,
}

/// Scheduler counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub qualifying: u64,
    pub frames_requested: u64,
    pub coalesced: u64,
    pub frames_run: u64,
}

/// Mutation-driven pass scheduler
#[derive(Debug)]
pub struct ChangeScheduler {
    state: SchedulerState,
    stats: SchedulerStats,
}

impl ChangeScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            stats: SchedulerStats::default(),
        }
    }

    /// Observer options matching what `qualifies` looks at
    pub fn observer_init() -> MutationObserverInit {
        MutationObserverInit {
            child_list: true,
            attributes: true,
            subtree: true,
            attribute_old_value: false,
            attribute_filter: Some(WATCHED_ATTRIBUTES.iter().map(|a| a.to_string()).collect()),
        }
    }

    /// Element additions anywhere, or a change to a watched attribute
    pub fn qualifies(record: &MutationRecord, tree: &DomTree) -> bool {
        match record.mutation_type {
            MutationType::ChildList => record
                .added_nodes
                .iter()
                .any(|&id| tree.element(id).is_some()),
            MutationType::Attributes => record
                .attribute_name
                .as_deref()
                .is_some_and(|name| WATCHED_ATTRIBUTES.contains(&name)),
        }
    }

    /// Feed a batch of observer records
    pub fn notify(&mut self, records: &[MutationRecord], tree: &DomTree) -> ScheduleDecision {
        let qualifying = records.iter().filter(|r| Self::qualifies(r, tree)).count() as u64;
        if qualifying == 0 {
            return ScheduleDecision::Ignored;
        }
        self.stats.qualifying += qualifying;

        match self.state {
            SchedulerState::Idle => {
                self.state = SchedulerState::Scheduled;
                self.stats.frames_requested += 1;
                // Everything past the first qualifying record rides along.
                self.stats.coalesced += qualifying - 1;
                tracing::trace!(qualifying, "scheduled normalization frame");
                ScheduleDecision::RequestFrame
            }
            SchedulerState::Scheduled => {
                self.stats.coalesced += qualifying;
                ScheduleDecision::Coalesced
            }
        }
    }

    /// Frame callback fired. Returns true if a pass is due; the caller runs
    /// it and then calls `end_frame`.
    pub fn begin_frame(&mut self) -> bool {
        if self.state == SchedulerState::Scheduled {
            self.stats.frames_run += 1;
            true
        } else {
            false
        }
    }

    /// Pass finished (or was skipped); back to idle
    pub fn end_frame(&mut self) {
        self.state = SchedulerState::Idle;
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

impl Default for ChangeScheduler {
    fn default() -> Self {
        Self::new()
    }
}
