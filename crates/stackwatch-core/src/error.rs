//! Error types for stackwatch-core.

use std::time::Duration;

/// Result type alias using [`StackwatchError`].
pub type StackwatchResult<T> = Result<T, StackwatchError>;

/// Provider message fragment CloudFormation uses for a missing stack.
const DOES_NOT_EXIST: &str = "does not exist";

/// Classification of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The provider reported that the stack does not exist.
    StackNotFound,
    /// Any other transport or service failure.
    Other,
}

/// A failure returned by one of the remote control-plane operations.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct ApiError {
    operation: &'static str,
    message: String,
    kind: ApiErrorKind,
}

impl ApiError {
    /// Create an API error, classifying it from the provider message.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = if message.contains(DOES_NOT_EXIST) {
            ApiErrorKind::StackNotFound
        } else {
            ApiErrorKind::Other
        };
        Self {
            operation,
            message,
            kind,
        }
    }

    /// Create an error for a stack the provider does not know about.
    pub fn stack_not_found(operation: &'static str, stack_name: &str) -> Self {
        Self {
            operation,
            message: format!("Stack with id {stack_name} {DOES_NOT_EXIST}"),
            kind: ApiErrorKind::StackNotFound,
        }
    }

    /// Name of the remote operation that failed.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Provider message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn is_stack_not_found(&self) -> bool {
        self.kind == ApiErrorKind::StackNotFound
    }
}

/// Errors that can occur while creating, executing or destroying a stack.
#[derive(Debug, thiserror::Error)]
pub enum StackwatchError {
    /// Remote call failed. Never retried.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The changeset poll loop ran past its deadline.
    #[error("changeset {changeset_id} failed to reach a terminal state within {timeout:?}")]
    ChangesetTimeout {
        /// Changeset being polled.
        changeset_id: String,
        /// Configured deadline.
        timeout: Duration,
    },

    /// A provider event lacks a field needed to identify it.
    #[error("stack event is missing required field `{field}`")]
    MalformedEvent {
        /// Provider field name.
        field: &'static str,
    },

    /// A parameter value cannot be expressed as a string.
    #[error("parameter `{key}` has a {found} value which cannot be converted to a string")]
    ParameterType {
        /// Flattened parameter key.
        key: String,
        /// JSON type that was found.
        found: &'static str,
    },

    /// Execution was requested before a changeset existed.
    #[error("no changeset has been created for stack {0}")]
    NoChangeset(String),

    /// A changeset was already created by this orchestrator.
    #[error("a changeset was already created for stack {0}")]
    ChangesetAlreadyCreated(String),

    /// A watcher task panicked or was aborted.
    #[error("watcher task failed: {0}")]
    WatcherTask(String),

    /// Several watchers failed.
    #[error("{} watchers failed: {}", .0.len(), join_messages(.0))]
    Multiple(Vec<StackwatchError>),
}

impl StackwatchError {
    /// Collapse a set of watcher errors into a single result.
    pub fn join(mut errors: Vec<StackwatchError>) -> StackwatchResult<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }

    /// True when the failure only means the stack is gone.
    pub fn is_stack_not_found(&self) -> bool {
        match self {
            Self::Api(err) => err.is_stack_not_found(),
            Self::Multiple(errors) => {
                !errors.is_empty() && errors.iter().all(StackwatchError::is_stack_not_found)
            }
            _ => false,
        }
    }
}

fn join_messages(errors: &[StackwatchError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
