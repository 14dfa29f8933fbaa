//! Concurrent observation of a running stack operation.
//!
//! Two watchers run as separate tasks under one cancellation scope:
//! - the stack-status watcher polls the aggregate stack status;
//! - the event-stream watcher reports every event not already cached.
//!
//! Whichever watcher finishes first cancels the scope. Cancellation is
//! checked only between polls, so the sibling may finish one more poll cycle
//! before it exits. A cancelled watcher returns `Ok`.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{ApiError, StackwatchError, StackwatchResult};
use crate::events::{EventCache, EventCategory};
use crate::provider::CloudFormationApi;
use crate::report::{EventRecord, Phase, Reporter};
use crate::status::is_terminal_status;

use super::{Orchestrator, WatchOutcome};

/// Everything a watcher task needs, owned so it can move into a task.
#[derive(Clone)]
pub(crate) struct WatchContext {
    pub api: Arc<dyn CloudFormationApi>,
    pub reporter: Arc<dyn Reporter>,
    pub cache: Arc<EventCache>,
    pub stack_id: String,
    pub poll_interval: Duration,
}

impl Orchestrator {
    /// Run both watchers until one reaches a terminal condition or the
    /// timeout passes.
    ///
    /// Errors from both watchers are collected after both have exited. A
    /// timeout is not an error: the provider keeps running the operation and
    /// stackwatch simply stops observing it.
    pub(super) async fn run_watchers(&self) -> StackwatchResult<WatchOutcome> {
        let scope = CancellationToken::new();
        let context = self.watch_context();

        let mut watchers = JoinSet::new();
        watchers.spawn(watch_stack_status(context.clone(), scope.clone()));
        watchers.spawn(watch_event_stream(context, scope.clone()));

        let timed_out = tokio::select! {
            _ = scope.cancelled() => false,
            _ = tokio::time::sleep(self.config.timeout) => {
                scope.cancel();
                true
            }
        };

        let mut errors = Vec::new();
        while let Some(joined) = watchers.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) => errors.push(err),
                Err(join_err) => errors.push(StackwatchError::WatcherTask(join_err.to_string())),
            }
        }
        StackwatchError::join(errors)?;

        if timed_out {
            info!(
                phase = %Phase::Execution,
                timeout = ?self.config.timeout,
                "Reached timeout deadline waiting for stack to complete"
            );
            return Ok(WatchOutcome::TimedOut);
        }

        Ok(WatchOutcome::Completed)
    }
}

/// Poll the stack until its aggregate status is terminal.
async fn watch_stack_status(ctx: WatchContext, scope: CancellationToken) -> StackwatchResult<()> {
    let _cancel_on_exit = scope.clone().drop_guard();

    loop {
        let stacks = ctx.api.describe_stacks(&ctx.stack_id).await?;
        let stack = stacks
            .first()
            .ok_or_else(|| ApiError::stack_not_found("DescribeStacks", &ctx.stack_id))?;

        if is_terminal_status(&stack.status) {
            ctx.reporter
                .event(&EventRecord::deployment(&ctx.stack_id, &stack.status));
            return Ok(());
        }

        // Sleep before checking so a cancelled watcher never calls the API again.
        tokio::time::sleep(ctx.poll_interval).await;

        if scope.is_cancelled() {
            debug!(phase = %Phase::Execution, watcher = "stack", "watcher cancelled");
            return Ok(());
        }
        debug!(phase = %Phase::Execution, watcher = "stack", "polling stack status again");
    }
}

/// Report every stack event not seen before, oldest first within each poll.
async fn watch_event_stream(ctx: WatchContext, scope: CancellationToken) -> StackwatchResult<()> {
    let _cancel_on_exit = scope.clone().drop_guard();

    loop {
        let events = ctx.api.describe_stack_events(&ctx.stack_id).await?;

        // The provider lists newest first.
        for raw in events.iter().rev() {
            let event_id = raw.require_event_id()?;
            if ctx.cache.exists(event_id) {
                continue;
            }

            let event = EventCache::record_from_raw(raw, EventCategory::Resource)?;
            let record = EventRecord::from_stack_event(Phase::Execution, &event);
            if ctx.cache.add_if_absent(event_id, event) {
                ctx.reporter.event(&record);
            }
        }

        tokio::time::sleep(ctx.poll_interval).await;

        if scope.is_cancelled() {
            debug!(phase = %Phase::Execution, watcher = "events", "watcher cancelled");
            return Ok(());
        }
        debug!(phase = %Phase::Execution, watcher = "events", "polling stack events again");
    }
}
