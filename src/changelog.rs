//! Release notes rendering and changelog maintenance
//!
//! This is the boundary to the changelog collaborator: the engine asks it
//! which labels are release-relevant, hands it the selected changes, and
//! receives rendered notes back.

use crate::error::{Error, Result};
use crate::types::ChangeRequest;
use chrono::Utc;
use semver::Version;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Labels the changelog reports on, in rendering order
pub const RELEVANT_LABELS: &[(&str, &str)] = &[
    ("breaking", "Breaking changes"),
    ("feature", "Enhancements"),
    ("fix", "Bug fixes"),
    ("performance", "Performance"),
    ("docs", "Documentation"),
];

/// Whether a label marks a change request as worth reporting
pub fn release_relevant(label: &str) -> bool {
    RELEVANT_LABELS.iter().any(|(name, _)| *name == label)
}

/// Render release notes for one library
///
/// Changes are grouped by their first relevant label. An empty change set
/// still renders a valid (if terse) section.
pub fn render(title: &str, previous: Option<&Version>, changes: &[ChangeRequest]) -> String {
    let mut out = String::new();

    out.push_str(&format!("### {title} — {}\n", Utc::now().format("%Y-%m-%d")));
    if let Some(previous) = previous {
        out.push_str(&format!("\nChanges since {previous}.\n"));
    }

    if changes.is_empty() {
        out.push_str("\nNo user-facing changes in this release.\n");
        return out;
    }

    for (label, heading) in RELEVANT_LABELS {
        let group: Vec<&ChangeRequest> =
            changes.iter().filter(|c| first_label(c) == Some(label)).collect();
        if group.is_empty() {
            continue;
        }

        out.push_str(&format!("\n#### {heading}\n\n"));
        for change in group {
            out.push_str(&format!("- {} (#{})\n", change.title, change.number));
        }
    }

    out
}

/// The first release-relevant label on a change, in rendering order
fn first_label(change: &ChangeRequest) -> Option<&'static str> {
    RELEVANT_LABELS
        .iter()
        .map(|(name, _)| *name)
        .find(|name| change.has_label(name))
}

/// Prepend a rendered section to the changelog file
///
/// The file is created when missing so a library's first release works on
/// a fresh tree.
pub fn cut(path: &Path, notes: &str) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(Error::Changelog(format!(
                "failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let mut content = String::with_capacity(notes.len() + existing.len() + 1);
    content.push_str(notes);
    if !existing.is_empty() {
        content.push('\n');
        content.push_str(&existing);
    }

    fs::write(path, content)
        .map_err(|e| Error::Changelog(format!("failed to write {}: {e}", path.display())))?;
    debug!(path = %path.display(), "changelog updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn change(number: u64, title: &str, labels: &[&str]) -> ChangeRequest {
        ChangeRequest {
            number,
            merge_commit: format!("{number:040x}"),
            merged_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            title: title.to_string(),
            labels: labels.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn groups_changes_by_label_in_fixed_order() {
        let changes = vec![
            change(20, "Speed up parser", &["performance"]),
            change(18, "Drop legacy API", &["breaking"]),
            change(19, "Fix crash on empty input", &["fix"]),
        ];

        let notes = render("Awesome 4.2.0", None, &changes);
        let breaking = notes.find("Breaking changes").unwrap();
        let fixes = notes.find("Bug fixes").unwrap();
        let perf = notes.find("Performance").unwrap();
        assert!(breaking < fixes && fixes < perf);
        assert!(notes.contains("- Drop legacy API (#18)"));
    }

    #[test]
    fn empty_change_set_renders_valid_notes() {
        let notes = render("Awesome 4.2.0", Some(&Version::parse("4.1.0").unwrap()), &[]);
        assert!(notes.starts_with("### Awesome 4.2.0"));
        assert!(notes.contains("Changes since 4.1.0."));
        assert!(notes.contains("No user-facing changes"));
    }

    #[test]
    fn cut_prepends_to_existing_changelog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Changelog.md");
        fs::write(&path, "### Awesome 4.1.0\n\nOld entry.\n").unwrap();

        cut(&path, "### Awesome 4.2.0\n\nNew entry.\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("### Awesome 4.2.0"));
        assert!(content.contains("### Awesome 4.1.0"));
        let new_pos = content.find("4.2.0").unwrap();
        let old_pos = content.find("4.1.0").unwrap();
        assert!(new_pos < old_pos);
    }

    #[test]
    fn cut_creates_missing_changelog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Changelog.md");

        cut(&path, "### Awesome 1.0.0\n").unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("1.0.0"));
    }
}
