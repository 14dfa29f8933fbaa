//! Append-only event store keyed by provider event id.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{StackwatchError, StackwatchResult};
use crate::provider::RawStackEvent;

use super::{EventCategory, StackEvent};

/// In-memory set of events already seen for one stack.
///
/// Shared between the priming step and the event-stream watcher. Entries are
/// never removed, so a given event id is reported at most once per process.
#[derive(Debug, Default)]
pub struct EventCache {
    events: Mutex<HashMap<String, StackEvent>>,
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `event_id` has been seen.
    pub fn exists(&self, event_id: &str) -> bool {
        self.lock().contains_key(event_id)
    }

    /// Insert an event. Re-inserting an id overwrites the stored record.
    pub fn add(&self, event_id: impl Into<String>, event: StackEvent) {
        self.lock().insert(event_id.into(), event);
    }

    /// Insert an event unless the id is already present.
    ///
    /// Returns `true` when the event was new. The check and the insert happen
    /// under one lock.
    pub fn add_if_absent(&self, event_id: &str, event: StackEvent) -> bool {
        let mut events = self.lock();
        if events.contains_key(event_id) {
            return false;
        }
        events.insert(event_id.to_string(), event);
        true
    }

    /// Stored record for `event_id`.
    pub fn get(&self, event_id: &str) -> Option<StackEvent> {
        self.lock().get(event_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Normalize a provider event.
    ///
    /// Logical id, physical id and status are required; an event without them
    /// cannot be reported or deduplicated safely.
    pub fn record_from_raw(
        raw: &RawStackEvent,
        category: EventCategory,
    ) -> StackwatchResult<StackEvent> {
        Ok(StackEvent {
            resource_name: required(&raw.logical_resource_id, "LogicalResourceId")?,
            provider_resource_id: required(&raw.physical_resource_id, "PhysicalResourceId")?,
            status: required(&raw.resource_status, "ResourceStatus")?,
            category,
            resource_type: raw.resource_type.clone(),
            status_reason: raw.resource_status_reason.clone(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StackEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn required(value: &Option<String>, field: &'static str) -> StackwatchResult<String> {
    value
        .clone()
        .ok_or(StackwatchError::MalformedEvent { field })
}
