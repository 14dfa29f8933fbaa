//! Session state shared by every stack operation.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::config::WatchConfig;
use crate::error::StackwatchResult;
use crate::events::{EventCache, EventCategory};
use crate::provider::CloudFormationApi;
use crate::report::Reporter;
use crate::status::REVIEW_IN_PROGRESS;

use super::watch::WatchContext;

/// Drives one stack through changeset creation, execution or deletion.
///
/// Created once per command. The event cache lives exactly as long as the
/// orchestrator and is only shared with the watcher tasks it spawns.
pub struct Orchestrator {
    pub(super) api: Arc<dyn CloudFormationApi>,
    pub(super) reporter: Arc<dyn Reporter>,
    pub(super) cache: Arc<EventCache>,
    pub(super) config: WatchConfig,
    pub(super) changeset_id: OnceLock<String>,
}

impl Orchestrator {
    pub fn new(
        config: WatchConfig,
        api: Arc<dyn CloudFormationApi>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            api,
            reporter,
            cache: Arc::new(EventCache::new()),
            config,
            changeset_id: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn stack_id(&self) -> &str {
        &self.config.stack_id
    }

    /// Identifier of the changeset created by this orchestrator, once set.
    pub fn changeset_id(&self) -> Option<&str> {
        self.changeset_id.get().map(String::as_str)
    }

    /// Whether the stack exists in a state a changeset can update.
    ///
    /// A missing stack, an ambiguous describe result, or a stack left in
    /// review by a never-executed changeset all count as not existing.
    pub async fn stack_exists(&self) -> StackwatchResult<bool> {
        let stacks = match self.api.describe_stacks(self.stack_id()).await {
            Ok(stacks) => stacks,
            Err(err) if err.is_stack_not_found() => return Ok(false),
            Err(err) => return Err(err.into()),
        };

        match stacks.as_slice() {
            [stack] => Ok(stack.status != REVIEW_IN_PROGRESS),
            _ => Ok(false),
        }
    }

    /// Load the stack's current event history so it is never reported as new.
    pub(super) async fn prime_event_cache(&self) -> StackwatchResult<usize> {
        let events = self.api.describe_stack_events(self.stack_id()).await?;

        for raw in &events {
            let event_id = raw.require_event_id()?;
            let event = EventCache::record_from_raw(raw, EventCategory::Cache)?;
            self.cache.add(event_id, event);
        }

        debug!(
            stack_name = %self.stack_id(),
            primed = events.len(),
            "event cache primed"
        );
        Ok(events.len())
    }

    pub(super) fn watch_context(&self) -> WatchContext {
        WatchContext {
            api: Arc::clone(&self.api),
            reporter: Arc::clone(&self.reporter),
            cache: Arc::clone(&self.cache),
            stack_id: self.config.stack_id.clone(),
            poll_interval: self.config.poll_interval,
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("changeset_id", &self.changeset_id.get())
            .field("cached_events", &self.cache.len())
            .finish_non_exhaustive()
    }
}
