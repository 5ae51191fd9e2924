//! GitHub token retrieval

use super::AuthSource;
use crate::error::{Error, Result};
use std::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// A resolved GitHub credential
#[derive(Debug, Clone)]
pub struct GitHubAuth {
    /// The personal access token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Resolve a GitHub token from the environment or the gh CLI
///
/// Environment variables win over the CLI so CI and scripts can override
/// whatever `gh auth login` has cached.
pub fn get_github_auth() -> Result<GitHubAuth> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var)
            && !token.trim().is_empty()
        {
            debug!(var, "using token from environment");
            return Ok(GitHubAuth {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
            });
        }
    }

    if let Some(token) = gh_cli_token() {
        debug!("using token from gh CLI");
        return Ok(GitHubAuth {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no GitHub token found; set GITHUB_TOKEN or run 'gh auth login'".to_string(),
    ))
}

/// Ask the gh CLI for its cached token, if gh is installed and logged in
fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}
