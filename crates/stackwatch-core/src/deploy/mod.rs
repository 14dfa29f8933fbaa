//! Changeset, execution and destroy orchestration.
//!
//! The [`Orchestrator`] owns one stack's session state and event cache.
//! Operations run in order: `create_changeset`, then `execute`; `destroy`
//! stands alone.

pub mod changeset;
pub mod destroy;
pub mod orchestrator;
mod watch;

use serde::Serialize;

use crate::provider::ChangeSetType;

pub use orchestrator::Orchestrator;

/// Final observation of a changeset.
///
/// A `FAILED` status is still a successful observation; callers decide what
/// it means for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangesetReport {
    pub changeset_id: String,
    pub changeset_type: ChangeSetType,
    pub status: String,
    pub status_reason: Option<String>,
}

impl ChangesetReport {
    pub fn is_failed(&self) -> bool {
        self.status == "FAILED"
    }
}

/// How a watch over a running stack operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WatchOutcome {
    /// The stack reached a terminal status.
    Completed,
    /// The deadline passed first. The provider-side operation keeps running.
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExecuteOutcome {
    /// The changeset had nothing to apply, so nothing was executed.
    NoChanges,
    Completed,
    TimedOut,
}

impl From<WatchOutcome> for ExecuteOutcome {
    fn from(outcome: WatchOutcome) -> Self {
        match outcome {
            WatchOutcome::Completed => ExecuteOutcome::Completed,
            WatchOutcome::TimedOut => ExecuteOutcome::TimedOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DestroyOutcome {
    /// There was no stack to delete.
    StackAbsent,
    Deleted,
    TimedOut,
}
