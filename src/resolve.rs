//! Cherry-pick application with interactive conflict recovery
//!
//! The recovery strategy is injected so tests can script the outcome
//! instead of suspending into a real shell.

use crate::error::{Error, Result};
use crate::git::GitRepo;
use anstream::eprintln;
use std::process::Command;
use tracing::{debug, warn};

/// Outcome of a conflict recovery session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Conflicts were resolved; the workflow resumes
    Resolved,
    /// The session was abandoned; the cherry-pick must be aborted
    Aborted,
}

/// Strategy invoked when a cherry-pick stops on conflicts
///
/// The blocking human-in-the-loop implementation is [`InteractiveShell`];
/// tests substitute scripted strategies.
pub trait ConflictStrategy {
    /// Run the recovery session against the conflicted working tree
    fn resolve(&self, repo: &GitRepo) -> Result<Resolution>;
}

/// Suspend into the user's shell until conflicts are dealt with
///
/// Blocks indefinitely; there is no timeout. A normal exit signals that the
/// conflicts were resolved (and the cherry-pick continued or completed); an
/// abnormal exit signals abandonment.
pub struct InteractiveShell;

impl ConflictStrategy for InteractiveShell {
    fn resolve(&self, repo: &GitRepo) -> Result<Resolution> {
        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
        debug!(%shell, "suspending into conflict recovery shell");

        let status = Command::new(&shell)
            .current_dir(repo.root())
            .status()
            .map_err(|e| Error::Internal(format!("failed to launch {shell}: {e}")))?;

        if status.success() {
            Ok(Resolution::Resolved)
        } else {
            Ok(Resolution::Aborted)
        }
    }
}

/// Apply an ordered cherry-pick batch, recovering from conflicts via the
/// given strategy
///
/// An empty batch is a no-op and never invokes the strategy. On conflict
/// the git output is surfaced verbatim before the session starts; an
/// abandoned session aborts the cherry-pick (restoring the pre-pick state)
/// and raises [`Error::UnresolvedConflict`].
pub fn apply(repo: &GitRepo, batch: &[String], strategy: &dyn ConflictStrategy) -> Result<()> {
    if batch.is_empty() {
        debug!("empty cherry-pick batch; nothing to apply");
        return Ok(());
    }

    match repo.cherry_pick(batch) {
        Ok(()) => Ok(()),
        Err(Error::Git { stderr, .. }) => {
            eprintln!("{stderr}");
            eprintln!();
            eprintln!(
                "Cherry-pick stopped on conflicts. Resolve them, run \
                 'git cherry-pick --continue', then exit the shell normally; \
                 exit non-zero to abort the release."
            );

            match strategy.resolve(repo)? {
                Resolution::Resolved if !repo.cherry_pick_in_progress() => {
                    debug!("conflicts resolved; resuming workflow");
                    Ok(())
                }
                Resolution::Resolved => {
                    // Exited normally but left the pick unfinished
                    warn!("recovery session ended with cherry-pick still in progress");
                    let _ = repo.cherry_pick_abort();
                    Err(Error::UnresolvedConflict)
                }
                Resolution::Aborted => {
                    repo.cherry_pick_abort()?;
                    Err(Error::UnresolvedConflict)
                }
            }
        }
        Err(other) => Err(other),
    }
}
