//! Configuration for the release pair, loaded from `.tandem.toml`
//!
//! The two libraries are one parameterized [`LibraryConfig`] type fed with
//! per-library values; nothing about core vs dependent is hard-coded beyond
//! the version link enforced at release construction.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Filename of the pair configuration at the repository root
pub const CONFIG_FILE: &str = ".tandem.toml";

/// Per-library release settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Short identifier (used in log output)
    pub name: String,
    /// Human title, used for commit messages and release titles
    pub title: String,
    /// Prefix distinguishing this library's tags in the shared release
    /// namespace (e.g. "core-v")
    pub tag_prefix: String,
    /// Files containing an embedded `VERSION = "x.y.z"` constant
    pub version_files: Vec<PathBuf>,
    /// Changelog file release notes are prepended to
    pub changelog: PathBuf,
}

/// The release pair: stable branch plus the two linked libraries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairConfig {
    /// Branch representing the last released state
    pub stable_branch: String,
    /// Remote the default branch and release records live on
    #[serde(default = "default_remote")]
    pub remote: String,
    /// The core library
    pub core: LibraryConfig,
    /// The dependent library (leading version segment trails core by one)
    pub dependent: LibraryConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Load the pair configuration from `<root>/.tandem.toml`
pub fn load_config(root: &Path) -> Result<PairConfig> {
    let path = root.join(CONFIG_FILE);

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: PairConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    if config.core.tag_prefix == config.dependent.tag_prefix {
        return Err(Error::Config(format!(
            "core and dependent share tag prefix '{}'; prefixes must be distinct",
            config.core.tag_prefix
        )));
    }

    Ok(config)
}
