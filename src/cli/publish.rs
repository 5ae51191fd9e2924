//! Publish command - create the remote release records

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use dialoguer::Confirm;
use std::path::Path;
use tandem::error::{Error, Result};
use tandem::release::{LibraryKind, Release, ReleaseCoordinator};
use tandem::resolve::InteractiveShell;
use terminal_link::Link;

/// Options for the publish command
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Target core library version
    pub version: String,
    /// Skip the confirmation prompt
    pub yes: bool,
}

/// Run the publish command
///
/// Creates one release record per library, tagged with the library's tag
/// prefix, with the rendered release notes as body.
pub async fn run_publish(path: &Path, options: PublishOptions) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let mut release = Release::new(&ctx.config, &options.version)?;

    // Never reached: publishing cherry-picks nothing
    let strategy = InteractiveShell;
    let coordinator =
        ReleaseCoordinator::new(&ctx.git, ctx.host.as_ref(), &strategy, &ctx.default_ref);

    // Populate the relevant sets once so the notes match what was released
    coordinator.plan(&mut release).await?;

    println!(
        "{} {} and {}",
        "Publishing".emphasis(),
        release.core.tag().accent(),
        release.dependent.tag().accent()
    );

    if !options.yes
        && !Confirm::new()
            .with_prompt("Create both release records?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
    {
        println!("{}", "Aborted".muted());
        return Ok(());
    }

    for which in [LibraryKind::Core, LibraryKind::Dependent] {
        let created = release.sub_mut(which).publish(ctx.host.as_ref()).await?;
        if supports_hyperlinks::supports_hyperlinks() {
            println!(
                "  {} {}",
                check(),
                Link::new(&created.tag_name, &created.html_url)
            );
        } else {
            println!(
                "  {} {} {}",
                check(),
                created.tag_name.accent(),
                created.html_url.muted()
            );
        }
    }

    Ok(())
}
