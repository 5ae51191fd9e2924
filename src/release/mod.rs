//! The release pair and its per-library descriptors
//!
//! A [`Release`] is constructed once per invocation from the target core
//! version; its two [`SubRelease`] descriptors are immutable afterwards
//! except for the relevant-change set, which is write-once per run.

mod coordinator;

pub use coordinator::{PrepareReport, ReleaseCoordinator};

use crate::changelog;
use crate::config::{LibraryConfig, PairConfig};
use crate::error::{Error, Result};
use crate::host::HostService;
use crate::types::{ChangeRequest, NewRelease, RemoteRelease};
use crate::version_file;
use semver::Version;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Which library of the pair an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LibraryKind {
    /// The core library
    Core,
    /// The dependent library
    Dependent,
}

/// Derive the dependent library's version from the core version
///
/// The leading segment trails the core's by one; every other segment and
/// any pre-release tag carry over unchanged.
pub fn derive_dependent_version(core: &Version) -> Result<Version> {
    if core.major == 0 {
        return Err(Error::VersionLink(format!(
            "core version {core} has no predecessor major for the dependent library"
        )));
    }

    Ok(Version {
        major: core.major - 1,
        minor: core.minor,
        patch: core.patch,
        pre: core.pre.clone(),
        build: core.build.clone(),
    })
}

/// Per-library release descriptor
#[derive(Debug, Clone)]
pub struct SubRelease {
    library: LibraryConfig,
    version: Version,
    /// Write-once per run; populated before cherry-picking begins
    relevant: Option<Vec<ChangeRequest>>,
    /// Lazily resolved previous released version
    previous: Option<Version>,
}

impl SubRelease {
    fn new(library: LibraryConfig, version: Version) -> Self {
        Self {
            library,
            version,
            relevant: None,
            previous: None,
        }
    }

    /// The library this descriptor releases
    pub fn library(&self) -> &LibraryConfig {
        &self.library
    }

    /// Version being released
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Human title, used as commit message and release title
    pub fn title(&self) -> String {
        format!("{} {}", self.library.title, self.version)
    }

    /// Tag the remote release record is created against
    pub fn tag(&self) -> String {
        format!("{}{}", self.library.tag_prefix, self.version)
    }

    /// Store the subset of `changes` the changelog collaborator recognizes
    /// as release-relevant
    ///
    /// Write-once: re-scanning mid-workflow would violate the ordering
    /// guarantees of the cherry-pick batch.
    pub fn set_relevant_changes(&mut self, changes: &[ChangeRequest]) -> Result<()> {
        if self.relevant.is_some() {
            return Err(Error::RelevantChangesAlreadySet(self.library.name.clone()));
        }

        let relevant: Vec<ChangeRequest> = changes
            .iter()
            .filter(|c| c.labels.iter().any(|l| changelog::release_relevant(l)))
            .cloned()
            .collect();

        debug!(
            library = %self.library.name,
            total = changes.len(),
            relevant = relevant.len(),
            "selected relevant changes"
        );
        self.relevant = Some(relevant);
        Ok(())
    }

    /// The relevant changes selected for this run (empty before selection)
    pub fn relevant_changes(&self) -> &[ChangeRequest] {
        self.relevant.as_deref().unwrap_or_default()
    }

    /// The library's previous released version
    ///
    /// Resolved from the remote release records on first call (most
    /// recently created record whose tag starts with this library's
    /// prefix) and cached; repeated calls never re-query.
    pub async fn previous_version(&mut self, host: &dyn HostService) -> Result<Version> {
        if let Some(ref version) = self.previous {
            return Ok(version.clone());
        }

        let releases = host.list_releases().await?;
        let latest = releases
            .into_iter()
            .filter(|r| r.tag_name.starts_with(&self.library.tag_prefix))
            .max_by_key(|r| r.created_at)
            .ok_or_else(|| Error::NoPreviousRelease(self.library.tag_prefix.clone()))?;

        let stripped = &latest.tag_name[self.library.tag_prefix.len()..];
        let version = Version::parse(stripped)?;
        debug!(library = %self.library.name, previous = %version, "resolved previous version");

        self.previous = Some(version.clone());
        Ok(version)
    }

    /// Rewrite every version file of this library to the release version
    pub fn rewrite_version_files(&self, root: &Path) -> Result<()> {
        for file in &self.library.version_files {
            version_file::rewrite(&root.join(file), &self.version)?;
        }
        Ok(())
    }

    /// Render this library's release notes
    pub async fn render_notes(&mut self, host: &dyn HostService) -> Result<String> {
        let previous = self.previous_version(host).await?;
        let relevant = self.relevant.as_deref().unwrap_or_default();
        Ok(changelog::render(&self.title(), Some(&previous), relevant))
    }

    /// Render release notes and prepend them to this library's changelog
    pub async fn cut_changelog(&mut self, root: &Path, host: &dyn HostService) -> Result<String> {
        let notes = self.render_notes(host).await?;
        changelog::cut(&root.join(&self.library.changelog), &notes)?;
        Ok(notes)
    }

    /// Publish the remote release record for this library
    ///
    /// Tagged `{tag_prefix}{version}`, titled identically, with the
    /// rendered release notes as body; flagged as a pre-release when the
    /// version carries a pre-release tag.
    pub async fn publish(&mut self, host: &dyn HostService) -> Result<RemoteRelease> {
        let body = self.render_notes(host).await?;
        let tag = self.tag();
        let new = NewRelease {
            title: tag.clone(),
            tag,
            body,
            prerelease: !self.version.pre.is_empty(),
        };
        host.create_release(&new).await
    }
}

/// A coordinated release of the version-linked pair
#[derive(Debug, Clone)]
pub struct Release {
    /// Core library descriptor
    pub core: SubRelease,
    /// Dependent library descriptor
    pub dependent: SubRelease,
    /// Branch representing the last released state
    pub stable_branch: String,
    /// Ephemeral branch created for this release attempt
    pub release_branch: String,
}

impl Release {
    /// Construct the release pair for a target core version
    pub fn new(config: &PairConfig, core_version: &str) -> Result<Self> {
        let core_version = Version::parse(core_version)?;
        let dependent_version = derive_dependent_version(&core_version)?;
        let release_branch = format!("release-{core_version}");

        Ok(Self {
            core: SubRelease::new(config.core.clone(), core_version),
            dependent: SubRelease::new(config.dependent.clone(), dependent_version),
            stable_branch: config.stable_branch.clone(),
            release_branch,
        })
    }

    /// Get one of the two descriptors
    pub fn sub_mut(&mut self, which: LibraryKind) -> &mut SubRelease {
        match which {
            LibraryKind::Core => &mut self.core,
            LibraryKind::Dependent => &mut self.dependent,
        }
    }

    /// Distribute scanned changes into both descriptors (write-once)
    pub fn distribute(&mut self, changes: &[ChangeRequest]) -> Result<()> {
        self.core.set_relevant_changes(changes)?;
        self.dependent.set_relevant_changes(changes)?;
        Ok(())
    }

    /// The time-ordered union of both descriptors' relevant changes
    ///
    /// Ascending merge timestamp; ties broken by ascending number so the
    /// batch order is deterministic.
    pub fn ordered_batch(&self) -> Vec<ChangeRequest> {
        let mut by_number: BTreeMap<u64, &ChangeRequest> = BTreeMap::new();
        for change in self
            .core
            .relevant_changes()
            .iter()
            .chain(self.dependent.relevant_changes())
        {
            by_number.entry(change.number).or_insert(change);
        }

        let mut batch: Vec<ChangeRequest> = by_number.into_values().cloned().collect();
        batch.sort_by(|a, b| a.merged_at.cmp(&b.merged_at).then(a.number.cmp(&b.number)));
        batch
    }
}
