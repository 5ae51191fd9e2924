//! Shared command context for CLI commands
//!
//! One explicit context object constructed per invocation and passed to
//! every component needing repository or network access - no lazily
//! memoized globals.

use std::path::{Path, PathBuf};
use tandem::config::{self, PairConfig};
use tandem::error::Result;
use tandem::git::GitRepo;
use tandem::host::{HostService, create_host_service, parse_repo_info};

/// Shared context for CLI commands that touch the repository and the
/// hosting service
pub struct CommandContext {
    /// The git working tree
    pub git: GitRepo,
    /// Root path of the working tree
    pub root: PathBuf,
    /// The release pair configuration
    pub config: PairConfig,
    /// Hosting service client
    pub host: Box<dyn HostService>,
    /// Remote the release records live on
    pub remote_name: String,
    /// Remote-qualified default branch ref (e.g. "origin/main")
    pub default_ref: String,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// Performs the setup shared by prepare/changelog/publish:
    /// - open the repository and load `.tandem.toml`
    /// - parse the remote URL into a hosting configuration
    /// - resolve credentials and create the hosting service
    /// - resolve the remote default branch
    pub async fn new(path: &Path) -> Result<Self> {
        let git = GitRepo::open(path)?;
        let root = git.root().to_path_buf();
        let config = config::load_config(&root)?;
        let remote_name = config.remote.clone();

        let remote_url = git.remote_url(&remote_name)?;
        let host_config = parse_repo_info(&remote_url)?;
        let host = create_host_service(&host_config).await?;

        let default_branch = git.default_branch(&remote_name)?;
        let default_ref = format!("{remote_name}/{default_branch}");

        Ok(Self {
            git,
            root,
            config,
            host,
            remote_name,
            default_ref,
        })
    }
}
