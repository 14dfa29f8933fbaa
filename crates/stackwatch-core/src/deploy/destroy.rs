//! Stack deletion.

use tracing::{debug, info};

use crate::error::StackwatchResult;
use crate::report::Phase;

use super::{DestroyOutcome, Orchestrator, WatchOutcome};

impl Orchestrator {
    /// Delete the stack and watch until it is gone.
    ///
    /// A stack that does not exist is already destroyed, both before the
    /// delete call and when the watchers lose sight of it afterwards.
    pub async fn destroy(&self) -> StackwatchResult<DestroyOutcome> {
        info!(phase = %Phase::Execution, "Verifying stack exists");

        if !self.stack_exists().await? {
            info!(phase = %Phase::Execution, "Stack does not exist, nothing to destroy");
            return Ok(DestroyOutcome::StackAbsent);
        }

        debug!(phase = %Phase::Execution, "Priming cache");
        self.prime_event_cache().await?;

        info!(phase = %Phase::Execution, "Destroying stack");
        self.api.delete_stack(self.stack_id()).await?;

        match self.run_watchers().await {
            Ok(WatchOutcome::Completed) => Ok(DestroyOutcome::Deleted),
            Ok(WatchOutcome::TimedOut) => Ok(DestroyOutcome::TimedOut),
            Err(err) if err.is_stack_not_found() => {
                info!(phase = %Phase::Execution, "Stack destroyed successfully");
                Ok(DestroyOutcome::Deleted)
            }
            Err(err) => Err(err),
        }
    }
}
