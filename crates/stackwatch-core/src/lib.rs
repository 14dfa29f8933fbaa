//! Stackwatch Core Library
//!
//! Drives CloudFormation changesets to completion and reports every
//! resource transition of a stack exactly once while a deployment or
//! deletion is in flight.

pub mod config;
pub mod deploy;
pub mod error;
pub mod events;
pub mod provider;
pub mod report;
pub mod status;
pub mod template;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{Settings, SettingsStore, WatchConfig};

    // Errors
    pub use crate::error::{ApiError, ApiErrorKind, StackwatchError, StackwatchResult};

    // Events
    pub use crate::events::{EventCache, EventCategory, StackEvent};

    // Orchestration
    pub use crate::deploy::{
        ChangesetReport, DestroyOutcome, ExecuteOutcome, Orchestrator, WatchOutcome,
    };

    // Provider
    pub use crate::provider::{
        AwsCloudFormation, ChangeSetSummary, ChangeSetType, CloudFormationApi,
        CreateChangeSetRequest, Parameter, RawStackEvent, StackSummary,
    };

    // Reporting
    pub use crate::report::{EventRecord, Phase, Reporter, StatusRecord, TracingReporter};

    // Templates
    pub use crate::template::{TemplateInput, TemplateOutput, flatten_parameters};
}
