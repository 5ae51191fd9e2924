//! Terminal styling helpers shared by the CLI commands

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Extension trait giving strings the handful of styles the CLI uses
pub trait Stylize {
    /// Bold, for the thing the sentence is about
    fn emphasis(&self) -> String;
    /// Cyan, for values (branches, versions, tags)
    fn accent(&self) -> String;
    /// Dimmed, for secondary detail
    fn muted(&self) -> String;
    /// Green, for good news
    fn success(&self) -> String;
    /// Yellow, for warnings
    fn warn(&self) -> String;
}

impl Stylize for str {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }
}

impl Stylize for String {
    fn emphasis(&self) -> String {
        self.as_str().emphasis()
    }

    fn accent(&self) -> String {
        self.as_str().accent()
    }

    fn muted(&self) -> String {
        self.as_str().muted()
    }

    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warn(&self) -> String {
        self.as_str().warn()
    }
}

/// Check mark for completed steps
pub fn check() -> String {
    "✓".green().to_string()
}

/// Spinner style used while waiting on the hosting service
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
}
