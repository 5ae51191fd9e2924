//! Changelog command - render release notes for one library

use crate::cli::context::CommandContext;
use anstream::println;
use std::path::Path;
use tandem::error::Result;
use tandem::release::{LibraryKind, Release, ReleaseCoordinator};
use tandem::resolve::InteractiveShell;

/// Run the changelog command
///
/// Scans unreleased changes and prints the rendered notes for the chosen
/// library. No branch is created and nothing is committed.
pub async fn run_changelog(path: &Path, version: &str, library: LibraryKind) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let mut release = Release::new(&ctx.config, version)?;

    // Never reached: this entry point cherry-picks nothing
    let strategy = InteractiveShell;
    let coordinator =
        ReleaseCoordinator::new(&ctx.git, ctx.host.as_ref(), &strategy, &ctx.default_ref);

    let notes = coordinator.cut_changelog_only(&mut release, library).await?;
    println!("{notes}");
    Ok(())
}
