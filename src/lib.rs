//! tandem - coordinated release automation for version-linked library pairs
//!
//! Automates cutting a coordinated release of two libraries whose versions
//! are linked (the dependent library's leading segment trails the core's by
//! one): scans for merged change requests missing from the stable branch,
//! cherry-picks the release-relevant ones in merge order, rewrites embedded
//! version constants, cuts changelogs, and commits per library - rolling the
//! repository back cleanly on any failure.

pub mod auth;
pub mod changelog;
pub mod config;
pub mod error;
pub mod git;
pub mod host;
pub mod release;
pub mod resolve;
pub mod scan;
pub mod types;
pub mod version_file;
