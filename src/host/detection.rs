//! Remote URL parsing

use crate::error::{Error, Result};
use crate::types::HostConfig;
use url::Url;

/// Parse owner, repo, and host out of a git remote URL
///
/// Handles both HTTPS and SSH formats:
/// - `https://github.com/owner/repo.git`
/// - `git@github.com:owner/repo.git`
///
/// A host other than github.com is kept as a custom (Enterprise) host.
pub fn parse_repo_info(remote_url: &str) -> Result<HostConfig> {
    let (host, path) = if let Some(rest) = remote_url.strip_prefix("git@") {
        // SSH format: git@host:owner/repo.git
        rest.split_once(':')
            .map(|(host, path)| (host.to_string(), path.to_string()))
            .ok_or_else(|| Error::RemoteUrl(remote_url.to_string()))?
    } else {
        // HTTPS format
        let url = Url::parse(remote_url).map_err(|_| Error::RemoteUrl(remote_url.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::RemoteUrl(remote_url.to_string()))?
            .to_string();
        let path = url.path().trim_start_matches('/').to_string();
        (host, path)
    };

    let path = path.strip_suffix(".git").unwrap_or(&path);
    let (owner, repo) = path
        .split_once('/')
        .ok_or_else(|| Error::RemoteUrl(remote_url.to_string()))?;

    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(Error::RemoteUrl(remote_url.to_string()));
    }

    let host = if host == "github.com" {
        None
    } else {
        Some(host)
    };

    Ok(HostConfig {
        owner: owner.to_string(),
        repo: repo.to_string(),
        host,
    })
}
