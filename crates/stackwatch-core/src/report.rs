//! Reporting sink for resource events and status transitions.
//!
//! The orchestrator never logs reportable records through a global logger;
//! it hands them to the [`Reporter`] supplied at construction.

use serde::Serialize;
use tracing::info;

use crate::events::StackEvent;

/// Stage of the operation a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Changeset,
    Execution,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Changeset => "Changeset",
            Phase::Execution => "Execution",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event type used for the aggregate stack record.
pub const DEPLOYMENT_EVENT_TYPE: &str = "Deployment";

/// A resource transition, or the final aggregate stack status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub phase: Phase,
    pub event_type: String,
    pub resource_name: String,
    pub provider_resource_id: String,
    pub status: String,
    pub message: Option<String>,
}

impl EventRecord {
    /// Record for a newly observed stack event.
    pub fn from_stack_event(phase: Phase, event: &StackEvent) -> Self {
        Self {
            phase,
            event_type: event.category.as_str().to_string(),
            resource_name: event.resource_name.clone(),
            provider_resource_id: event.provider_resource_id.clone(),
            status: event.status.clone(),
            message: event.status_reason.clone(),
        }
    }

    /// Record for the stack reaching a terminal aggregate status.
    pub fn deployment(stack_name: &str, status: &str) -> Self {
        Self {
            phase: Phase::Execution,
            event_type: DEPLOYMENT_EVENT_TYPE.to_string(),
            resource_name: stack_name.to_string(),
            provider_resource_id: String::new(),
            status: status.to_string(),
            message: None,
        }
    }
}

/// A changeset status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub phase: Phase,
    pub changeset_id: String,
    pub stack_name: String,
    pub status: String,
    pub message: Option<String>,
}

/// Destination for everything stackwatch reports.
pub trait Reporter: Send + Sync {
    fn event(&self, record: &EventRecord);

    fn status(&self, record: &StatusRecord);
}

/// Writes records as structured `tracing` events at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn event(&self, record: &EventRecord) {
        info!(
            phase = %record.phase,
            event_type = %record.event_type,
            resource_name = %record.resource_name,
            provider_resource_id = %record.provider_resource_id,
            status = %record.status,
            "{}",
            record.message.as_deref().unwrap_or_default()
        );
    }

    fn status(&self, record: &StatusRecord) {
        info!(
            phase = %record.phase,
            changeset_id = %record.changeset_id,
            stack_name = %record.stack_name,
            status = %record.status,
            "{}",
            record.message.as_deref().unwrap_or_default()
        );
    }
}
