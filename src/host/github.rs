//! GitHub hosting service implementation

use crate::error::{Error, Result};
use crate::host::{HostService, PAGE_SIZE};
use crate::types::{ChangeRequest, HostConfig, NewRelease, RemoteRelease};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// GitHub service using octocrab
pub struct GitHubHost {
    client: Octocrab,
    config: HostConfig,
    /// Token for raw HTTP requests (release listing)
    token: String,
    /// HTTP client for raw requests (release listing)
    http_client: Client,
    /// API host for raw requests
    api_host: String,
}

impl GitHubHost {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_host = if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            format!("{h}/api/v3")
        } else {
            "api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("tandem")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: HostConfig { owner, repo, host },
            token: token.to_string(),
            http_client,
            api_host,
        })
    }
}

/// Helper to convert an octocrab PR into a `ChangeRequest`
///
/// Returns `None` for closed-but-unmerged requests and for merged requests
/// the API reports without a merge commit (nothing to cherry-pick).
fn change_request_from_pr(pr: &octocrab::models::pulls::PullRequest) -> Option<ChangeRequest> {
    let merged_at = pr.merged_at?;
    let merge_commit = pr.merge_commit_sha.clone()?;

    let labels = pr
        .labels
        .as_ref()
        .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
        .unwrap_or_default();

    Some(ChangeRequest {
        number: pr.number,
        merge_commit,
        merged_at,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        labels,
    })
}

#[async_trait]
impl HostService for GitHubHost {
    async fn merged_page(&self, page: u32) -> Result<Vec<ChangeRequest>> {
        debug!(page, "fetching merged change requests");

        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Closed)
            .sort(octocrab::params::pulls::Sort::Updated)
            .direction(octocrab::params::Direction::Descending)
            .per_page(PAGE_SIZE)
            .page(page)
            .send()
            .await?;

        let requests: Vec<ChangeRequest> =
            prs.items.iter().filter_map(change_request_from_pr).collect();

        debug!(page, count = requests.len(), "fetched page");
        Ok(requests)
    }

    /// List release records via the raw REST endpoint
    ///
    /// Uses the raw HTTP client rather than octocrab's typed releases API:
    /// the previous-version derivation needs `created_at` on every record,
    /// which some GitHub Enterprise versions omit from the typed payload.
    async fn list_releases(&self) -> Result<Vec<RemoteRelease>> {
        #[derive(Deserialize)]
        struct ApiRelease {
            tag_name: String,
            created_at: Option<DateTime<Utc>>,
            html_url: String,
        }

        let url = format!(
            "https://{}/repos/{}/{}/releases?per_page=100",
            self.api_host, self.config.owner, self.config.repo
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch releases: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "Release listing returned {}",
                response.status()
            )));
        }

        let releases: Vec<ApiRelease> = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse releases: {e}")))?;

        // Drafts have no created_at; they never count as a previous release
        let result: Vec<RemoteRelease> = releases
            .into_iter()
            .filter_map(|r| {
                r.created_at.map(|created_at| RemoteRelease {
                    tag_name: r.tag_name,
                    created_at,
                    html_url: r.html_url,
                })
            })
            .collect();

        debug!(count = result.len(), "listed releases");
        Ok(result)
    }

    async fn create_release(&self, new: &NewRelease) -> Result<RemoteRelease> {
        debug!(tag = %new.tag, prerelease = new.prerelease, "creating release");

        let release = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .create(&new.tag)
            .name(&new.title)
            .body(&new.body)
            .prerelease(new.prerelease)
            .send()
            .await?;

        let result = RemoteRelease {
            tag_name: release.tag_name,
            created_at: release.created_at.unwrap_or_else(Utc::now),
            html_url: release.html_url.to_string(),
        };

        debug!(tag = %result.tag_name, "created release");
        Ok(result)
    }

    fn config(&self) -> &HostConfig {
        &self.config
    }
}
