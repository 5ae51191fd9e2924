//! Git operations for the release workflow
//!
//! Shells out to `git` for all operations so the user's hooks, signing, and
//! merge configuration apply, and so conflict recovery can hand the working
//! tree to an interactive shell mid cherry-pick.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Handle to a git working tree
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .arg("-C")
            .arg(path)
            .args(["rev-parse", "--show-toplevel"])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::Git {
                command: "rev-parse".to_string(),
                stderr,
            });
        }

        let root = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
        debug!(root = %root.display(), "opened repository");
        Ok(Self { root })
    }

    /// Root of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the currently checked-out branch
    pub fn current_branch(&self) -> Result<String> {
        let output = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        Ok(output.trim().to_string())
    }

    /// Whether the working tree has no staged or unstaged changes
    pub fn is_clean(&self) -> Result<bool> {
        let output = self.git(&["status", "--porcelain"])?;
        Ok(output.trim().is_empty())
    }

    /// Whether a local branch with this name exists
    pub fn branch_exists(&self, name: &str) -> Result<bool> {
        let result = self.git(&["rev-parse", "--verify", "--quiet", &format!("refs/heads/{name}")]);
        match result {
            Ok(_) => Ok(true),
            Err(Error::Git { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create and check out a new branch from `base`
    ///
    /// Fails if a branch with this name already exists.
    pub fn create_branch(&self, name: &str, base: &str) -> Result<()> {
        if self.branch_exists(name)? {
            return Err(Error::Git {
                command: "checkout".to_string(),
                stderr: format!("branch '{name}' already exists"),
            });
        }
        self.git(&["checkout", "-b", name, base])?;
        debug!(branch = name, base, "created branch");
        Ok(())
    }

    /// Check out an existing branch
    pub fn checkout(&self, name: &str) -> Result<()> {
        self.git(&["checkout", name])?;
        debug!(branch = name, "checked out");
        Ok(())
    }

    /// Forcibly delete a local branch
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        self.git(&["branch", "-D", name])?;
        debug!(branch = name, "deleted branch");
        Ok(())
    }

    /// Resolve the default branch of a remote (e.g. "main" for origin/HEAD)
    pub fn default_branch(&self, remote: &str) -> Result<String> {
        let output = self.git(&[
            "symbolic-ref",
            "--short",
            &format!("refs/remotes/{remote}/HEAD"),
        ])?;
        let full = output.trim();
        // "origin/main" -> "main"
        let branch = full
            .strip_prefix(&format!("{remote}/"))
            .unwrap_or(full)
            .to_string();
        debug!(remote, branch, "resolved default branch");
        Ok(branch)
    }

    /// Subject lines of merge commits reachable from `reference`, newest first
    ///
    /// First-parent only: side branches of a merged change request are not
    /// themselves part of the release history.
    pub fn merge_subjects(&self, reference: &str) -> Result<Vec<String>> {
        let output = self.git(&[
            "log",
            "--merges",
            "--first-parent",
            "--format=%s",
            reference,
        ])?;
        let subjects: Vec<String> = output
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        debug!(reference, count = subjects.len(), "merge subjects");
        Ok(subjects)
    }

    /// Apply an ordered list of merge commits as one combined cherry-pick
    ///
    /// Records provenance of each original commit (`-x`); `-m 1` selects the
    /// default-branch parent as mainline, since every batched commit is the
    /// merge commit of a change request. A non-zero exit leaves the
    /// cherry-pick in progress for conflict recovery.
    pub fn cherry_pick(&self, commits: &[String]) -> Result<()> {
        let mut args = vec!["cherry-pick", "-x", "-m", "1"];
        args.extend(commits.iter().map(String::as_str));
        self.git(&args)?;
        debug!(count = commits.len(), "cherry-pick applied");
        Ok(())
    }

    /// Whether a cherry-pick is currently in progress
    pub fn cherry_pick_in_progress(&self) -> bool {
        self.git(&["rev-parse", "--verify", "--quiet", "CHERRY_PICK_HEAD"])
            .is_ok()
    }

    /// Abort an in-progress cherry-pick, restoring the pre-pick state
    pub fn cherry_pick_abort(&self) -> Result<()> {
        self.git(&["cherry-pick", "--abort"])?;
        debug!("cherry-pick aborted");
        Ok(())
    }

    /// Discard all working-tree and index changes
    pub fn reset_hard(&self) -> Result<()> {
        self.git(&["reset", "--hard", "HEAD"])?;
        Ok(())
    }

    /// Commit all tracked changes with the given message
    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-a", "-m", message])?;
        debug!(message, "committed");
        Ok(())
    }

    /// Fetch URL of a named remote
    pub fn remote_url(&self, remote: &str) -> Result<String> {
        let output = self.git(&["remote", "get-url", remote])?;
        Ok(output.trim().to_string())
    }

    /// Subject lines of all commits in `range`, newest first (test support)
    pub fn subjects_in_range(&self, range: &str) -> Result<Vec<String>> {
        let output = self.git(&["log", "--format=%s", range])?;
        Ok(output
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Run a git subcommand in this working tree and return its stdout
    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(Error::Git {
                command: args.first().unwrap_or(&"").to_string(),
                stderr,
            })
        }
    }
}
