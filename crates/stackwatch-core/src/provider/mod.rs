//! Remote control-plane operations consumed by stackwatch.
//!
//! [`CloudFormationApi`] is the single seam between orchestration logic and
//! the provider. The production implementation is [`AwsCloudFormation`]; tests
//! supply scripted implementations.

pub mod aws;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{ApiError, StackwatchError, StackwatchResult};

pub use aws::AwsCloudFormation;

/// Whether a changeset creates a new stack or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeSetType {
    Create,
    Update,
}

impl std::fmt::Display for ChangeSetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeSetType::Create => f.write_str("CREATE"),
            ChangeSetType::Update => f.write_str("UPDATE"),
        }
    }
}

/// A single template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub key: String,
    pub value: String,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Stack as returned by DescribeStacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    pub stack_name: String,
    pub status: String,
    pub status_reason: Option<String>,
}

/// Event as returned by DescribeStackEvents, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStackEvent {
    pub event_id: Option<String>,
    pub logical_resource_id: Option<String>,
    pub physical_resource_id: Option<String>,
    pub resource_status: Option<String>,
    pub resource_type: Option<String>,
    pub resource_status_reason: Option<String>,
}

impl RawStackEvent {
    /// Provider event id, the deduplication key.
    pub fn require_event_id(&self) -> StackwatchResult<&str> {
        self.event_id
            .as_deref()
            .ok_or(StackwatchError::MalformedEvent { field: "EventId" })
    }
}

/// Changeset as returned by DescribeChangeSet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetSummary {
    pub status: String,
    pub status_reason: Option<String>,
    /// Number of resource changes the changeset would apply.
    pub change_count: usize,
}

/// Input for CreateChangeSet.
#[derive(Debug, Clone)]
pub struct CreateChangeSetRequest {
    pub stack_name: String,
    pub change_set_name: String,
    pub change_set_type: ChangeSetType,
    pub description: String,
    pub template_body: String,
    pub parameters: Vec<Parameter>,
}

/// The six remote operations stackwatch depends on.
///
/// Implementations must be safe for concurrent use: both watchers call into
/// the same instance at the same time.
#[async_trait]
pub trait CloudFormationApi: Send + Sync {
    /// Describe the named stack. Usually yields zero or one entry.
    async fn describe_stacks(&self, stack_name: &str) -> Result<Vec<StackSummary>, ApiError>;

    /// Most recent stack events, newest first.
    async fn describe_stack_events(&self, stack_name: &str)
    -> Result<Vec<RawStackEvent>, ApiError>;

    /// Create a changeset and return its identifier.
    async fn create_change_set(&self, request: &CreateChangeSetRequest)
    -> Result<String, ApiError>;

    async fn describe_change_set(
        &self,
        stack_name: &str,
        change_set_id: &str,
    ) -> Result<ChangeSetSummary, ApiError>;

    async fn execute_change_set(&self, stack_name: &str, change_set_id: &str)
    -> Result<(), ApiError>;

    async fn delete_stack(&self, stack_name: &str) -> Result<(), ApiError>;
}
