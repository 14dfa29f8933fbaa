//! Status classification for changesets and stacks.
//!
//! Statuses are provider-defined tokens and are compared by exact string
//! match. Changesets and stacks share one terminal set.

/// Stack status left behind by a changeset that was reviewed but never executed.
pub const REVIEW_IN_PROGRESS: &str = "REVIEW_IN_PROGRESS";

/// Statuses after which no further transition is expected.
pub const TERMINAL_STATUSES: [&str; 5] = [
    "FAILED",
    "CREATE_COMPLETE",
    "UPDATE_COMPLETE",
    "UPDATE_FAILED",
    "CREATE_FAILED",
];

/// Whether `status` ends the current changeset or stack operation.
pub fn is_terminal_status(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}
