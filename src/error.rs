//! Error types for tandem

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur during a release workflow
#[derive(Error, Debug)]
pub enum Error {
    /// Release branch could not be created (nothing has been mutated yet)
    #[error("failed to create release branch: {0}")]
    BranchCreation(String),

    /// A git invocation returned a non-zero exit code
    #[error("git {command} failed: {stderr}")]
    Git {
        /// The git subcommand that failed (e.g. "cherry-pick")
        command: String,
        /// Captured stderr, trimmed
        stderr: String,
    },

    /// The working tree has uncommitted changes
    #[error("working tree has uncommitted changes; commit or stash them first")]
    DirtyWorkingTree,

    /// The paginated change scan never matched the candidate id set
    #[error(
        "change scan did not converge after {pages} page(s); \
         unreleased ids never observed in merge history: {missing:?}"
    )]
    ScanNonConvergence {
        /// Pages fetched before giving up
        pages: u32,
        /// Candidate ids that never appeared in the paginated history
        missing: Vec<u64>,
    },

    /// Cherry-pick conflicts were left unresolved by the recovery session
    #[error("cherry-pick conflicts were not resolved; the cherry-pick was aborted")]
    UnresolvedConflict,

    /// No line matching the version-constant pattern was found
    #[error("no version constant found in {}", path.display())]
    VersionPatternNotFound {
        /// File that was searched
        path: PathBuf,
    },

    /// No remote release record matches the descriptor's tag prefix
    #[error("no release record found with tag prefix '{0}'")]
    NoPreviousRelease(String),

    /// The core/dependent version link is violated
    #[error("version link violated: {0}")]
    VersionLink(String),

    /// The relevant-change set was populated more than once in a run
    #[error("relevant changes for '{0}' were already set for this run")]
    RelevantChangesAlreadySet(String),

    /// GitHub API error (raw HTTP paths)
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// GitHub API error (octocrab typed paths)
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Authentication failed or no token was found
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration file missing or malformed
    #[error("configuration error: {0}")]
    Config(String),

    /// Version string failed to parse
    #[error("invalid version: {0}")]
    Version(#[from] semver::Error),

    /// Remote URL could not be parsed into owner/repo
    #[error("unsupported remote URL: {0}")]
    RemoteUrl(String),

    /// Changelog could not be read or written
    #[error("changelog error: {0}")]
    Changelog(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
