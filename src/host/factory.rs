//! Hosting service construction

use crate::auth::get_github_auth;
use crate::error::Result;
use crate::host::{GitHubHost, HostService};
use crate::types::HostConfig;
use tracing::debug;

/// Build the hosting service for the given repository configuration
///
/// Resolves credentials (environment variable or gh CLI) and constructs a
/// boxed service so callers depend only on the [`HostService`] trait.
pub async fn create_host_service(config: &HostConfig) -> Result<Box<dyn HostService>> {
    let auth = get_github_auth()?;
    debug!(repo = %config, source = %auth.source, "creating hosting service");

    let service = GitHubHost::new(
        &auth.token,
        config.owner.clone(),
        config.repo.clone(),
        config.host.clone(),
    )?;

    Ok(Box::new(service))
}
