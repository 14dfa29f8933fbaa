//! Configuration for a single stackwatch run
//!
//! Two layers:
//! - [`WatchConfig`]: what the orchestrator needs (stack id, poll interval, timeout)
//! - [`Settings`]: optional defaults read from `stackwatch.toml`

pub mod parser;
pub mod schema;
pub mod store;

use std::time::Duration;

pub use parser::{parse_settings_toml, parse_settings_toml_str};
pub use schema::Settings;
pub use store::SettingsStore;

/// Default wait for a stack operation before stackwatch stops observing.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Default pause between provider polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Fixed parameters of one orchestrator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Stack (package) name.
    pub stack_id: String,
    pub poll_interval: Duration,
    /// Wall-clock limit for the changeset poll loop and the watchers.
    pub timeout: Duration,
}

impl WatchConfig {
    pub fn new(stack_id: impl Into<String>) -> Self {
        Self {
            stack_id: stack_id.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject configurations the watchers cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.stack_id.trim().is_empty() {
            anyhow::bail!("Stack name must not be empty");
        }
        if self.poll_interval.is_zero() {
            anyhow::bail!("Poll interval must be greater than zero");
        }
        Ok(())
    }
}
