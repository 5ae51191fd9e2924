//! Prepare command - cut the coordinated release branch

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use std::path::Path;
use std::time::Duration;
use tandem::error::Result;
use tandem::release::{Release, ReleaseCoordinator};
use tandem::resolve::InteractiveShell;
use tandem::types::ChangeRequest;

/// Options for the prepare command
#[derive(Debug, Clone, Default)]
pub struct PrepareOptions {
    /// Target core library version
    pub version: String,
    /// Show what would be cherry-picked without making changes
    pub dry_run: bool,
}

/// Run the prepare command
pub async fn run_prepare(path: &Path, options: PrepareOptions) -> Result<()> {
    let ctx = CommandContext::new(path).await?;
    let mut release = Release::new(&ctx.config, &options.version)?;

    let strategy = InteractiveShell;
    let coordinator =
        ReleaseCoordinator::new(&ctx.git, ctx.host.as_ref(), &strategy, &ctx.default_ref);

    // Dry run: scan and report, mutate nothing
    if options.dry_run {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message("Scanning unreleased changes...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        let batch = coordinator.plan(&mut release).await?;
        spinner.finish_and_clear();

        report_dry_run(&release, &batch);
        return Ok(());
    }

    // Record the branch we will restore on failure, for the user-visible
    // rollback message
    let original = ctx.git.current_branch()?;

    println!(
        "{} {} {}",
        "Preparing".emphasis(),
        release.core.title().accent(),
        format!("+ {}", release.dependent.title()).accent()
    );

    match coordinator.prepare(&mut release).await {
        Ok(report) => {
            println!();
            if report.picked.is_empty() {
                println!("  {}", "No unreleased changes to cherry-pick".muted());
            } else {
                println!(
                    "  {} Cherry-picked {} change(s)",
                    check(),
                    report.picked.len()
                );
            }
            for message in &report.commits {
                println!("  {} Committed {}", check(), message.accent());
            }
            println!();
            println!(
                "{} Release prepared on {}",
                check(),
                report.release_branch.accent()
            );
            Ok(())
        }
        Err(error) => {
            println!();
            println!(
                "{} Release preparation failed; rolled back to {}",
                "✗".warn(),
                original.accent()
            );
            Err(error)
        }
    }
}

/// Report what would be cherry-picked (dry run)
fn report_dry_run(release: &Release, batch: &[ChangeRequest]) {
    println!("{}:", "Release plan".emphasis());
    println!();
    println!(
        "  {}: {} relevant change(s)",
        release.core.title().accent(),
        release.core.relevant_changes().len()
    );
    println!(
        "  {}: {} relevant change(s)",
        release.dependent.title().accent(),
        release.dependent.relevant_changes().len()
    );
    println!();

    if batch.is_empty() {
        println!("  {}", "Nothing to cherry-pick".muted());
        return;
    }

    println!("  Would cherry-pick, in merge order:");
    for change in batch {
        println!(
            "    #{} {} {}",
            change.number,
            change.title,
            format!("({})", change.merged_at.format("%Y-%m-%d")).muted()
        );
    }
    println!();
    println!("{}", "Run without --dry-run to execute.".muted());
}
