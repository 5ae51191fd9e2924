//! Core types for tandem

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A merged change request, as reported by the hosting service
///
/// Read-only to this system: tandem never mutates change requests, it only
/// selects and cherry-picks them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeRequest {
    /// Change request number
    pub number: u64,
    /// Commit id the merge produced on the default branch
    pub merge_commit: String,
    /// When the change request was merged
    pub merged_at: DateTime<Utc>,
    /// Change request title (used in release notes)
    pub title: String,
    /// Labels attached to the change request
    pub labels: Vec<String>,
}

impl ChangeRequest {
    /// Check whether the request carries the given label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A release record on the hosting service
///
/// Used only to derive a library's previous version: the most recently
/// created record whose tag starts with the library's tag prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRelease {
    /// Tag the release points at (e.g. "core-v4.1.0")
    pub tag_name: String,
    /// When the release record was created
    pub created_at: DateTime<Utc>,
    /// Web URL for the release
    pub html_url: String,
}

/// Payload for creating a release record on the hosting service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRelease {
    /// Tag to create the release against
    pub tag: String,
    /// Release title (identical to the tag by convention)
    pub title: String,
    /// Release notes body (rendered changelog section)
    pub body: String,
    /// Whether this is a pre-release
    pub prerelease: bool,
}

/// Hosting service configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl std::fmt::Display for HostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
