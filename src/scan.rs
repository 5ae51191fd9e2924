//! Scanning for merged change requests not yet on the stable branch
//!
//! Two halves, split so the interesting logic stays pure:
//! 1. [`candidate_ids`] - diff the merge logs of the default and stable
//!    branches by subject line (pure, no I/O)
//! 2. [`scan_unreleased`] - page through the hosting service until every
//!    candidate id has been observed (effectful, bounded)

use crate::error::{Error, Result};
use crate::host::HostService;
use crate::types::ChangeRequest;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tracing::debug;

/// Hard cap on pages fetched before the scan is declared non-convergent
///
/// The accumulate-and-compare loop cannot terminate when a candidate id
/// never appears in the paginated merge history (squash-merged or rebased
/// out); the cap turns that hang into [`Error::ScanNonConvergence`].
pub const MAX_SCAN_PAGES: u32 = 32;

/// Merge subjects look like "Merge pull request #123 from acme/topic"
static MERGE_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge pull request #(\d+)\b").expect("merge subject pattern is valid")
});

/// Extract the change request id from a merge-commit subject line
pub fn merge_subject_id(subject: &str) -> Option<u64> {
    MERGE_SUBJECT
        .captures(subject)
        .and_then(|captures| captures.get(1))
        .and_then(|id| id.as_str().parse().ok())
}

/// Ids of merged change requests present on the default branch but absent
/// from the stable branch
///
/// The diff is by subject line, not commit id: stable carries back-ported
/// copies of released merges, so only the message survives the port.
pub fn candidate_ids(default_subjects: &[String], stable_subjects: &[String]) -> BTreeSet<u64> {
    let released: BTreeSet<&str> = stable_subjects.iter().map(String::as_str).collect();

    default_subjects
        .iter()
        .filter(|subject| !released.contains(subject.as_str()))
        .filter_map(|subject| merge_subject_id(subject))
        .collect()
}

/// Retrieve the change requests matching `candidates` from the paginated
/// merge history
///
/// Fetches reverse-chronological pages, keeping only requests whose id is a
/// candidate, and stops as soon as the retained id set equals the candidate
/// set exactly. Returns the retained requests in ascending id order.
pub async fn scan_unreleased(
    host: &dyn HostService,
    candidates: &BTreeSet<u64>,
) -> Result<Vec<ChangeRequest>> {
    if candidates.is_empty() {
        debug!("no unreleased candidates; skipping scan");
        return Ok(Vec::new());
    }

    let mut retained: BTreeMap<u64, ChangeRequest> = BTreeMap::new();
    let mut pages_fetched = 0;

    for page in 1..=MAX_SCAN_PAGES {
        let requests = host.merged_page(page).await?;
        pages_fetched = page;
        let exhausted = requests.is_empty();

        for request in requests {
            if candidates.contains(&request.number) {
                retained.entry(request.number).or_insert(request);
            }
        }

        let observed: BTreeSet<u64> = retained.keys().copied().collect();
        debug!(
            page,
            observed = observed.len(),
            wanted = candidates.len(),
            "scan progress"
        );

        if observed == *candidates {
            return Ok(retained.into_values().collect());
        }

        if exhausted {
            break;
        }
    }

    let observed: BTreeSet<u64> = retained.keys().copied().collect();
    let missing: Vec<u64> = candidates.difference(&observed).copied().collect();
    Err(Error::ScanNonConvergence {
        pages: pages_fetched,
        missing,
    })
}
