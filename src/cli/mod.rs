//! CLI commands for tandem

pub mod changelog;
pub mod context;
pub mod prepare;
pub mod publish;
pub mod style;

pub use changelog::run_changelog;
pub use prepare::{PrepareOptions, run_prepare};
pub use publish::{PublishOptions, run_publish};
