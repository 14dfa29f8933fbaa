//! Normalized stack events and the deduplicating event cache.

pub mod cache;

use serde::Serialize;

pub use cache::EventCache;

/// Where an event entered the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventCategory {
    /// Pre-existing history loaded while priming. Never emitted.
    Cache,
    /// Discovered during live observation. Always emitted once.
    Resource,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Cache => "Cache",
            EventCategory::Resource => "Resource",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider event reduced to the fields stackwatch reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackEvent {
    /// Logical identifier of the resource inside the template.
    pub resource_name: String,
    /// Identifier assigned by the provider; empty until the resource exists.
    pub provider_resource_id: String,
    /// Provider status token, compared verbatim.
    pub status: String,
    pub category: EventCategory,
    /// Provider resource type, e.g. `AWS::S3::Bucket`.
    pub resource_type: Option<String>,
    /// Provider explanation attached to the status.
    pub status_reason: Option<String>,
}
