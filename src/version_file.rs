//! In-place rewriting of embedded version constants

use crate::error::{Error, Result};
use regex::Regex;
use semver::Version;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// A literal assignment to a version constant holding a quoted semantic
/// version, e.g. `VERSION = "3.4.0"` or `  VERSION = '2.0.0.rc1'.freeze`
static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?<head>.*\bVERSION\b\s*=\s*)(?<quote>["'])(?<value>[^"']+)(?<tail>["'].*)$"#)
        .expect("version line pattern is valid")
});

/// Replace the version constant in `path` with `version`, in place
///
/// Exactly one line is rewritten - the first that matches the pattern; every
/// other byte of the file is preserved, including line endings. Zero matches
/// is [`Error::VersionPatternNotFound`].
pub fn rewrite(path: &Path, version: &Version) -> Result<()> {
    let content = fs::read_to_string(path)?;

    let mut rewritten = String::with_capacity(content.len());
    let mut replaced = false;

    for line in content.split_inclusive('\n') {
        let body = line.strip_suffix('\n').map_or(line, |b| b);
        let body = body.strip_suffix('\r').map_or(body, |b| b);

        if !replaced && let Some(captures) = VERSION_LINE.captures(body) {
            let new_body = format!(
                "{}{}{}{}",
                &captures["head"], &captures["quote"], version, &captures["tail"]
            );
            rewritten.push_str(&new_body);
            rewritten.push_str(&line[body.len()..]);
            replaced = true;
        } else {
            rewritten.push_str(line);
        }
    }

    if !replaced {
        return Err(Error::VersionPatternNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::write(path, rewritten)?;
    debug!(path = %path.display(), %version, "rewrote version constant");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn rewrites_only_the_version_value() {
        let file = write_temp("module Awesome\n  VERSION = \"3.4.0\"\nend\n");
        rewrite(file.path(), &Version::parse("3.5.0").unwrap()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "module Awesome\n  VERSION = \"3.5.0\"\nend\n");
    }

    #[test]
    fn preserves_single_quotes_and_suffix() {
        let file = write_temp("VERSION = '1.2.3'.freeze\n");
        rewrite(file.path(), &Version::parse("1.3.0").unwrap()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "VERSION = '1.3.0'.freeze\n");
    }

    #[test]
    fn preserves_crlf_line_endings() {
        let file = write_temp("VERSION = \"0.9.0\"\r\nOTHER = 1\r\n");
        rewrite(file.path(), &Version::parse("1.0.0").unwrap()).unwrap();

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "VERSION = \"1.0.0\"\r\nOTHER = 1\r\n");
    }

    #[test]
    fn missing_pattern_is_an_error() {
        let file = write_temp("nothing to see here\n");
        let result = rewrite(file.path(), &Version::parse("1.0.0").unwrap());

        assert!(matches!(
            result,
            Err(Error::VersionPatternNotFound { .. })
        ));
        // File untouched on failure
        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "nothing to see here\n");
    }
}
