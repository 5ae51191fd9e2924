//! Shared test fixtures
//!
//! `TempPairRepo` builds a real git repository in a temp directory shaped
//! like the release pair tandem manages: a default branch collecting merged
//! change requests and a stable branch representing the last release.

#![allow(dead_code)]

pub mod mock_host;

pub use mock_host::{MockHostService, make_change, mock_config};

use std::path::Path;
use std::process::Command;
use tandem::config::{LibraryConfig, PairConfig};
use tandem::error::Result;
use tandem::git::GitRepo;
use tandem::resolve::{ConflictStrategy, Resolution};
use tempfile::TempDir;

/// Pair configuration matching the fixture repository layout
pub fn pair_config() -> PairConfig {
    PairConfig {
        stable_branch: "stable".to_string(),
        remote: "origin".to_string(),
        core: LibraryConfig {
            name: "awesome".to_string(),
            title: "Awesome".to_string(),
            tag_prefix: "awesome-v".to_string(),
            version_files: vec!["core/version.rb".into()],
            changelog: "Changelog-Core.md".into(),
        },
        dependent: LibraryConfig {
            name: "extras".to_string(),
            title: "Awesome Extras".to_string(),
            tag_prefix: "extras-v".to_string(),
            version_files: vec!["extras/version.rb".into()],
            changelog: "Changelog-Extras.md".into(),
        },
    }
}

/// A real git repository fixture for the release pair
pub struct TempPairRepo {
    dir: TempDir,
}

impl TempPairRepo {
    /// Create the fixture: initial commit on `main`, `stable` branched at
    /// the same commit
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Self { dir };

        repo.git(&["init"]);
        repo.git(&["checkout", "-b", "main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);

        repo.write("core/version.rb", "module Awesome\n  VERSION = \"4.1.0\"\nend\n");
        repo.write("extras/version.rb", "module Extras\n  VERSION = \"3.1.0\"\nend\n");
        repo.write("core/notes.txt", "base\n");
        repo.write("Changelog-Core.md", "### Awesome 4.1.0\n\nOld entry.\n");
        repo.write("Changelog-Extras.md", "### Awesome Extras 3.1.0\n\nOld entry.\n");
        repo.git(&["add", "-A"]);
        repo.git(&["commit", "-m", "Initial import"]);
        repo.git(&["branch", "stable"]);

        repo
    }

    /// Path to the working tree
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open the fixture as a [`GitRepo`]
    pub fn repo(&self) -> GitRepo {
        GitRepo::open(self.path()).expect("open fixture repo")
    }

    /// Write a file relative to the repo root (creating parent dirs)
    pub fn write(&self, path: &str, content: &str) {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(full, content).expect("write fixture file");
    }

    /// Read a file relative to the repo root
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("read fixture file")
    }

    /// Merge a simulated change request into `main` and return the merge
    /// commit id
    ///
    /// The merge subject matches the hosting service's convention, so the
    /// scanner's candidate derivation picks it up.
    pub fn merge_change(&self, number: u64, topic: &str, file: &str, content: &str) -> String {
        self.git(&["checkout", "-b", topic, "main"]);
        self.write(file, content);
        self.git(&["add", "-A"]);
        self.git(&["commit", "-m", &format!("Work on {topic}")]);
        self.git(&["checkout", "main"]);
        self.git(&[
            "merge",
            "--no-ff",
            topic,
            "-m",
            &format!("Merge pull request #{number} from acme/{topic}"),
        ]);
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    /// Commit a change directly on the stable branch
    pub fn commit_on_stable(&self, file: &str, content: &str, message: &str) {
        self.git(&["checkout", "stable"]);
        self.write(file, content);
        self.git(&["add", "-A"]);
        self.git(&["commit", "-m", message]);
        self.git(&["checkout", "main"]);
    }

    /// Run git in the fixture, panicking on failure (test helper)
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .current_dir(self.path())
            .args(args)
            .output()
            .expect("run git");
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }
}

impl Default for TempPairRepo {
    fn default() -> Self {
        Self::new()
    }
}

// === Scripted conflict strategies ===

/// Strategy that must never be invoked (empty-batch scenarios)
pub struct PanicStrategy;

impl ConflictStrategy for PanicStrategy {
    fn resolve(&self, _repo: &GitRepo) -> Result<Resolution> {
        panic!("conflict strategy invoked for a batch that should not conflict");
    }
}

/// Strategy that abandons the recovery session
pub struct AbortStrategy;

impl ConflictStrategy for AbortStrategy {
    fn resolve(&self, _repo: &GitRepo) -> Result<Resolution> {
        Ok(Resolution::Aborted)
    }
}

/// Strategy that resolves the conflict by writing `resolution` to `file`
/// and continuing the cherry-pick, as a human would in the shell
pub struct ScriptedResolve {
    /// File to overwrite, relative to the repo root
    pub file: String,
    /// Content that resolves the conflict
    pub resolution: String,
}

impl ConflictStrategy for ScriptedResolve {
    fn resolve(&self, repo: &GitRepo) -> Result<Resolution> {
        std::fs::write(repo.root().join(&self.file), &self.resolution)
            .expect("write conflict resolution");

        let run = |args: &[&str]| {
            let output = Command::new("git")
                .current_dir(repo.root())
                .args(args)
                .output()
                .expect("run git");
            assert!(
                output.status.success(),
                "git {args:?} failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        };
        run(&["add", "-A"]);
        run(&["-c", "core.editor=true", "cherry-pick", "--continue"]);

        Ok(Resolution::Resolved)
    }
}
