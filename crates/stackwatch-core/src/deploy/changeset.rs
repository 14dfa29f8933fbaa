//! Changeset creation, status polling and execution.

use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{StackwatchError, StackwatchResult};
use crate::provider::{ChangeSetType, CreateChangeSetRequest, Parameter};
use crate::report::{Phase, StatusRecord};
use crate::status::is_terminal_status;

use super::{ChangesetReport, ExecuteOutcome, Orchestrator};

const CHANGESET_DESCRIPTION: &str = "Changeset created via stackwatch";

impl Orchestrator {
    /// Create a changeset for the template and wait until it settles.
    ///
    /// An existing stack gets an `Update` changeset and its event history is
    /// primed first; otherwise a `Create` changeset is submitted with an
    /// empty cache.
    pub async fn create_changeset(
        &self,
        template_body: &str,
        parameters: &[Parameter],
    ) -> StackwatchResult<ChangesetReport> {
        if self.changeset_id.get().is_some() {
            return Err(StackwatchError::ChangesetAlreadyCreated(
                self.stack_id().to_string(),
            ));
        }

        let change_set_type = if self.stack_exists().await? {
            debug!(phase = %Phase::Changeset, "Priming cache");
            self.prime_event_cache().await?;
            ChangeSetType::Update
        } else {
            ChangeSetType::Create
        };

        info!(phase = %Phase::Changeset, change_set_type = %change_set_type, "Creating changeset");

        let request = CreateChangeSetRequest {
            stack_name: self.stack_id().to_string(),
            change_set_name: changeset_name(self.stack_id()),
            change_set_type,
            description: CHANGESET_DESCRIPTION.to_string(),
            template_body: template_body.to_string(),
            parameters: parameters.to_vec(),
        };

        let changeset_id = self.api.create_change_set(&request).await?;
        self.changeset_id
            .set(changeset_id.clone())
            .map_err(|_| StackwatchError::ChangesetAlreadyCreated(self.stack_id().to_string()))?;

        self.wait_for_changeset(&changeset_id, change_set_type).await
    }

    /// Poll the changeset until it reaches a terminal status.
    ///
    /// Each distinct status is reported once. Exceeding the timeout before a
    /// terminal status is a hard failure.
    async fn wait_for_changeset(
        &self,
        changeset_id: &str,
        changeset_type: ChangeSetType,
    ) -> StackwatchResult<ChangesetReport> {
        let started = Instant::now();
        let mut previous_status: Option<String> = None;

        loop {
            let summary = self
                .api
                .describe_change_set(self.stack_id(), changeset_id)
                .await?;

            if previous_status.as_deref() != Some(summary.status.as_str()) {
                if is_terminal_status(&summary.status) {
                    self.reporter.status(&StatusRecord {
                        phase: Phase::Changeset,
                        changeset_id: changeset_id.to_string(),
                        stack_name: self.stack_id().to_string(),
                        status: summary.status.clone(),
                        message: summary.status_reason.clone(),
                    });

                    return Ok(ChangesetReport {
                        changeset_id: changeset_id.to_string(),
                        changeset_type,
                        status: summary.status,
                        status_reason: summary.status_reason,
                    });
                }

                self.reporter.status(&StatusRecord {
                    phase: Phase::Changeset,
                    changeset_id: changeset_id.to_string(),
                    stack_name: self.stack_id().to_string(),
                    status: summary.status.clone(),
                    message: None,
                });
                previous_status = Some(summary.status);
            }

            if started.elapsed() > self.config.timeout {
                return Err(StackwatchError::ChangesetTimeout {
                    changeset_id: changeset_id.to_string(),
                    timeout: self.config.timeout,
                });
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Execute the created changeset and watch the stack until it settles.
    ///
    /// A changeset with no changes is not executed.
    pub async fn execute(&self) -> StackwatchResult<ExecuteOutcome> {
        let changeset_id = self
            .changeset_id()
            .ok_or_else(|| StackwatchError::NoChangeset(self.stack_id().to_string()))?;

        info!(phase = %Phase::Execution, "Validating changeset");
        let summary = self
            .api
            .describe_change_set(self.stack_id(), changeset_id)
            .await?;

        if summary.change_count == 0 {
            info!(phase = %Phase::Execution, "No changes in changeset");
            return Ok(ExecuteOutcome::NoChanges);
        }

        info!(phase = %Phase::Execution, changes = summary.change_count, "Executing changeset");
        self.api
            .execute_change_set(self.stack_id(), changeset_id)
            .await?;

        let outcome = self.run_watchers().await?;
        debug!(phase = %Phase::Execution, outcome = ?outcome, "execution watch finished");
        Ok(outcome.into())
    }
}

/// Changeset names must be unique across runs against the same stack.
fn changeset_name(stack_id: &str) -> String {
    format!("{}-{}", stack_id, chrono::Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changeset_name_has_stack_prefix_and_timestamp() {
        let name = changeset_name("demo-stack");
        let suffix = name.strip_prefix("demo-stack-").unwrap();
        assert!(suffix.parse::<i64>().unwrap() > 0);
    }
}
