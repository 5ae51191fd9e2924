//! Hosting-service client for change requests and release records
//!
//! Provides a unified interface over the remote code-hosting API so the
//! release engine can be driven by a mock in tests.

mod detection;
mod factory;
mod github;

pub use detection::parse_repo_info;
pub use factory::create_host_service;
pub use github::GitHubHost;

use crate::error::Result;
use crate::types::{ChangeRequest, HostConfig, NewRelease, RemoteRelease};
use async_trait::async_trait;

/// Number of change requests fetched per page
pub const PAGE_SIZE: u8 = 100;

/// Hosting service operations needed by the release engine
///
/// All calls are awaited sequentially by the single-threaded workflow;
/// implementations never see concurrent requests.
#[async_trait]
pub trait HostService: Send + Sync {
    /// Fetch one page of merged change requests, most recently updated
    /// first
    ///
    /// Pages are numbered from 1. An empty page means the history is
    /// exhausted.
    async fn merged_page(&self, page: u32) -> Result<Vec<ChangeRequest>>;

    /// List release records for the repository
    async fn list_releases(&self) -> Result<Vec<RemoteRelease>>;

    /// Create a release record
    async fn create_release(&self, new: &NewRelease) -> Result<RemoteRelease>;

    /// Get the hosting configuration
    fn config(&self) -> &HostConfig;
}
