//! Schema of `stackwatch.toml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Defaults read from the settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// AWS region used when no `--region` flag is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Seconds to wait for a stack operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Seconds between provider polls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_secs == Some(0) {
            anyhow::bail!("poll_interval_secs must be greater than zero");
        }
        if self
            .region
            .as_deref()
            .is_some_and(|region| region.trim().is_empty())
        {
            anyhow::bail!("region must not be empty");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_secs.map(Duration::from_secs)
    }
}
