//! Mock hosting service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use tandem::error::{Error, Result};
use tandem::host::HostService;
use tandem::types::{ChangeRequest, HostConfig, NewRelease, RemoteRelease};

/// Simple mock hosting service for testing
///
/// Features:
/// - Scripted pages of merged change requests
/// - Scripted release records
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockHostService {
    config: HostConfig,
    pages: Mutex<Vec<Vec<ChangeRequest>>>,
    releases: Mutex<Vec<RemoteRelease>>,
    // Call tracking
    merged_page_calls: Mutex<Vec<u32>>,
    list_releases_calls: AtomicU32,
    created_releases: Mutex<Vec<NewRelease>>,
    // Error injection
    error_on_merged_page: Mutex<Option<String>>,
    error_on_list_releases: Mutex<Option<String>>,
    error_on_create_release: Mutex<Option<String>>,
}

impl MockHostService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            config: mock_config(),
            pages: Mutex::new(Vec::new()),
            releases: Mutex::new(Vec::new()),
            merged_page_calls: Mutex::new(Vec::new()),
            list_releases_calls: AtomicU32::new(0),
            created_releases: Mutex::new(Vec::new()),
            error_on_merged_page: Mutex::new(None),
            error_on_list_releases: Mutex::new(None),
            error_on_create_release: Mutex::new(None),
        }
    }

    /// Append a page of merged change requests
    pub fn push_page(&self, page: Vec<ChangeRequest>) {
        self.pages.lock().unwrap().push(page);
    }

    /// Add a release record
    pub fn add_release(&self, tag: &str, created_at: DateTime<Utc>) {
        self.releases.lock().unwrap().push(RemoteRelease {
            tag_name: tag.to_string(),
            created_at,
            html_url: format!("https://github.com/acme/widgets/releases/tag/{tag}"),
        });
    }

    // === Error injection methods ===

    /// Make `merged_page` return an error
    pub fn fail_merged_page(&self, msg: &str) {
        *self.error_on_merged_page.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_releases` return an error
    pub fn fail_list_releases(&self, msg: &str) {
        *self.error_on_list_releases.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_release` return an error
    pub fn fail_create_release(&self, msg: &str) {
        *self.error_on_create_release.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    /// Pages requested so far, in order
    pub fn merged_page_calls(&self) -> Vec<u32> {
        self.merged_page_calls.lock().unwrap().clone()
    }

    /// Number of `list_releases` calls so far
    pub fn list_releases_call_count(&self) -> u32 {
        self.list_releases_calls.load(Ordering::SeqCst)
    }

    /// Release records created through this mock
    pub fn created_releases(&self) -> Vec<NewRelease> {
        self.created_releases.lock().unwrap().clone()
    }
}

impl Default for MockHostService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostService for MockHostService {
    async fn merged_page(&self, page: u32) -> Result<Vec<ChangeRequest>> {
        self.merged_page_calls.lock().unwrap().push(page);

        if let Some(msg) = self.error_on_merged_page.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }

        let pages = self.pages.lock().unwrap();
        Ok(pages
            .get((page - 1) as usize)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_releases(&self) -> Result<Vec<RemoteRelease>> {
        self.list_releases_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(msg) = self.error_on_list_releases.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }

        Ok(self.releases.lock().unwrap().clone())
    }

    async fn create_release(&self, new: &NewRelease) -> Result<RemoteRelease> {
        if let Some(msg) = self.error_on_create_release.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }

        self.created_releases.lock().unwrap().push(new.clone());
        Ok(RemoteRelease {
            tag_name: new.tag.clone(),
            created_at: Utc::now(),
            html_url: format!("https://github.com/acme/widgets/releases/tag/{}", new.tag),
        })
    }

    fn config(&self) -> &HostConfig {
        &self.config
    }
}

/// Hosting config used by the mock
pub fn mock_config() -> HostConfig {
    HostConfig {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        host: None,
    }
}

/// Build a change request with a synthetic merge timestamp
pub fn make_change(number: u64, merge_commit: &str, hour: u32, labels: &[&str]) -> ChangeRequest {
    ChangeRequest {
        number,
        merge_commit: merge_commit.to_string(),
        merged_at: Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap(),
        title: format!("Change #{number}"),
        labels: labels.iter().map(ToString::to_string).collect(),
    }
}
