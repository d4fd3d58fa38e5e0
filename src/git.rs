//! Tag queries against a git working directory.
//!
//! The only operation the build needs from git is `describe`: the nearest
//! reachable tag, either with the commit-distance suffix (for the package
//! version fallback) or without it (for the protocol tag). A failed query
//! is fatal to the build — there is no sensible fallback when the tag
//! source itself is broken — so errors carry the exit code and captured
//! stderr verbatim. No retries.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("failed to run git in {dir}: {source}")]
    Spawn {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("git describe failed in {dir} (exit code {code}): {stderr}")]
    Describe {
        dir: PathBuf,
        code: i32,
        stderr: String,
    },
}

/// Which flavor of `git describe --tags` to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescribeMode {
    /// `git describe --tags`: nearest tag plus `-N-gHASH` distance suffix
    /// when not exactly on a tag.
    WithDistance,
    /// `git describe --tags --abbrev=0`: nearest tag only.
    TagOnly,
}

impl DescribeMode {
    fn args(self) -> &'static [&'static str] {
        match self {
            DescribeMode::WithDistance => &["describe", "--tags"],
            DescribeMode::TagOnly => &["describe", "--tags", "--abbrev=0"],
        }
    }
}

/// Run `git describe --tags [--abbrev=0]` in `dir` and return the trimmed
/// tag string.
pub fn describe(dir: &Path, mode: DescribeMode) -> Result<String, GitError> {
    let output = Command::new("git")
        .args(mode.args())
        .current_dir(dir)
        .output()
        .map_err(|source| GitError::Spawn {
            dir: dir.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(GitError::Describe {
            dir: dir.to_path_buf(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn describe_mode_args() {
        assert_eq!(DescribeMode::WithDistance.args(), ["describe", "--tags"]);
        assert_eq!(
            DescribeMode::TagOnly.args(),
            ["describe", "--tags", "--abbrev=0"]
        );
    }

    #[test]
    fn describe_outside_a_repo_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = describe(tmp.path(), DescribeMode::TagOnly).unwrap_err();
        match err {
            GitError::Describe { code, .. } => assert_ne!(code, 0),
            // Images without git in PATH surface the spawn failure instead
            GitError::Spawn { .. } => {}
        }
    }
}
