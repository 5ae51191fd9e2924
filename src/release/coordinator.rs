//! The prepare-and-commit workflow
//!
//! Sequential, single control-flow thread. The whole of `prepare()` is one
//! logical transaction over the working tree: any failure after the release
//! branch exists rolls every repository-visible side effect back and
//! re-raises the original error.

use super::{LibraryKind, Release};
use crate::error::{Error, Result};
use crate::git::GitRepo;
use crate::host::HostService;
use crate::resolve::{self, ConflictStrategy};
use crate::scan;
use crate::types::ChangeRequest;
use tracing::{debug, warn};

/// What a successful `prepare()` produced
#[derive(Debug, Clone)]
pub struct PrepareReport {
    /// The branch the release was prepared on
    pub release_branch: String,
    /// Cherry-picked changes, in application order
    pub picked: Vec<ChangeRequest>,
    /// Messages of the commits created, in order (core, then dependent)
    pub commits: Vec<String>,
}

/// Top-level state machine composing scanner, resolver, rewriter, and
/// changelog into the release workflow
pub struct ReleaseCoordinator<'a> {
    git: &'a GitRepo,
    host: &'a dyn HostService,
    strategy: &'a dyn ConflictStrategy,
    /// Remote-qualified default branch ref (e.g. "origin/main")
    default_ref: String,
}

impl<'a> ReleaseCoordinator<'a> {
    /// Create a coordinator over the given collaborators
    pub fn new(
        git: &'a GitRepo,
        host: &'a dyn HostService,
        strategy: &'a dyn ConflictStrategy,
        default_ref: impl Into<String>,
    ) -> Self {
        Self {
            git,
            host,
            strategy,
            default_ref: default_ref.into(),
        }
    }

    /// Scan unreleased changes and return the ordered cherry-pick batch
    /// without touching the repository
    ///
    /// Used by dry runs; populates the descriptors' relevant sets as a
    /// side effect, so call it on a throwaway [`Release`].
    pub async fn plan(&self, release: &mut Release) -> Result<Vec<ChangeRequest>> {
        self.scan_and_distribute(release).await?;
        Ok(release.ordered_batch())
    }

    /// Run the full prepare-and-commit workflow
    ///
    /// Creates the release branch, cherry-picks the relevant unreleased
    /// changes in merge order, rewrites version files, cuts changelogs,
    /// and commits once per library. Any failure after branch creation
    /// restores the original branch, deletes the release branch, and
    /// re-raises the failure unchanged.
    pub async fn prepare(&self, release: &mut Release) -> Result<PrepareReport> {
        if !self.git.is_clean()? {
            return Err(Error::DirtyWorkingTree);
        }

        let original = self.git.current_branch()?;
        debug!(original, release_branch = %release.release_branch, "starting release preparation");

        // Nothing has been mutated yet, so branch-creation failure needs
        // no rollback
        self.git
            .create_branch(&release.release_branch, &release.stable_branch)
            .map_err(|e| Error::BranchCreation(e.to_string()))?;

        match self.run(release).await {
            Ok(report) => Ok(report),
            Err(error) => {
                self.rollback(&original, &release.release_branch);
                Err(error)
            }
        }
    }

    /// The fallible body of `prepare()`, from scan to final commit
    async fn run(&self, release: &mut Release) -> Result<PrepareReport> {
        self.scan_and_distribute(release).await?;

        let batch = release.ordered_batch();
        let commits: Vec<String> = batch.iter().map(|c| c.merge_commit.clone()).collect();
        debug!(count = commits.len(), "applying cherry-pick batch");
        resolve::apply(self.git, &commits, self.strategy)?;

        let root = self.git.root().to_path_buf();
        let mut messages = Vec::new();
        for which in [LibraryKind::Core, LibraryKind::Dependent] {
            let sub = release.sub_mut(which);
            sub.rewrite_version_files(&root)?;
            sub.cut_changelog(&root, self.host).await?;
            let title = sub.title();
            self.git.commit_all(&title)?;
            messages.push(title);
        }

        Ok(PrepareReport {
            release_branch: release.release_branch.clone(),
            picked: batch,
            commits: messages,
        })
    }

    /// Narrow entry point: scan and render release notes for one library
    ///
    /// No branch creation, no file writes, no commits.
    pub async fn cut_changelog_only(
        &self,
        release: &mut Release,
        which: LibraryKind,
    ) -> Result<String> {
        self.scan_and_distribute(release).await?;
        release.sub_mut(which).render_notes(self.host).await
    }

    /// Derive candidate ids from the merge logs, scan the hosting service,
    /// and populate both descriptors (write-once)
    async fn scan_and_distribute(&self, release: &mut Release) -> Result<()> {
        let default_subjects = self.git.merge_subjects(&self.default_ref)?;
        let stable_subjects = self.git.merge_subjects(&release.stable_branch)?;
        let candidates = scan::candidate_ids(&default_subjects, &stable_subjects);
        debug!(candidates = candidates.len(), "derived unreleased candidates");

        let changes = scan::scan_unreleased(self.host, &candidates).await?;
        release.distribute(&changes)
    }

    /// Restore the repository to its pre-`prepare()` state, best effort
    ///
    /// Order matters: an in-flight cherry-pick blocks checkout, and the
    /// release branch cannot be deleted while checked out.
    fn rollback(&self, original: &str, release_branch: &str) {
        warn!(restored = original, deleted = release_branch, "rolling back release attempt");

        if self.git.cherry_pick_in_progress()
            && let Err(e) = self.git.cherry_pick_abort()
        {
            warn!(error = %e, "failed to abort cherry-pick during rollback");
        }
        if let Err(e) = self.git.reset_hard() {
            warn!(error = %e, "failed to reset working tree during rollback");
        }
        if let Err(e) = self.git.checkout(original) {
            warn!(error = %e, "failed to restore original branch during rollback");
        }
        if let Err(e) = self.git.delete_branch(release_branch) {
            warn!(error = %e, "failed to delete release branch during rollback");
        }
    }
}
