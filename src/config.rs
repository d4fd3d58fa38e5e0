//! Tool configuration module.
//!
//! Handles loading and validating `docs-macros.toml`. One config file sits
//! next to the documentation sources; user files are sparse and override
//! stock defaults key by key. Unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [repo]
//! url = "https://github.com/example/project"  # No trailing slash
//! dir = "."                                   # Where `git describe` runs
//!
//! [proto]
//! site_url = "https://example.github.io/protocol"  # No trailing slash
//! dir = "proto"                                    # Protocol checkout dir
//! nav_placeholder = "https://example.github.io/protocol/"
//!
//! [maven]
//! group = "com.example"     # Maven group ID for badges
//! artifact_prefix = ""      # Prepended to the module name
//! artifact_suffix = ""      # Appended to the module name (e.g. "_3")
//!
//! [snippets]
//! dir = "snippets"          # Base directory for code_example() files
//! indent = 0                # Spaces prepended to every embedded line
//!
//! [policy]
//! malformed_tags = "strict" # "strict" fails the build, "lenient" truncates
//! ```

use crate::version::TagPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config filename expected next to the documentation sources.
pub const CONFIG_FILENAME: &str = "docs-macros.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `docs-macros.toml`.
///
/// All fields have sensible defaults; user config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Repository the documentation belongs to (links, describe queries).
    pub repo: RepoConfig,
    /// Protocol submodule settings (docs site, checkout dir, nav placeholder).
    pub proto: ProtoConfig,
    /// Maven coordinates used by badge macros.
    pub maven: MavenConfig,
    /// Code snippet embedding settings.
    pub snippets: SnippetsConfig,
    /// Error-handling policies.
    pub policy: PolicyConfig,
}

impl BuildConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repo.url.is_empty() || self.repo.url.ends_with('/') {
            return Err(ConfigError::Validation(
                "repo.url must be non-empty with no trailing slash".into(),
            ));
        }
        if self.proto.site_url.is_empty() || self.proto.site_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "proto.site_url must be non-empty with no trailing slash".into(),
            ));
        }
        if self.maven.group.is_empty() {
            return Err(ConfigError::Validation(
                "maven.group must be non-empty".into(),
            ));
        }
        Ok(())
    }
}

/// Repository settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Base URL of the repository on its forge, without a trailing slash.
    pub url: String,
    /// Working directory for `git describe` against the repository itself.
    pub dir: PathBuf,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            url: "https://github.com/example/project".to_string(),
            dir: PathBuf::from("."),
        }
    }
}

/// Protocol submodule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtoConfig {
    /// Base URL of the published protocol docs, without a trailing slash.
    pub site_url: String,
    /// Directory of the protocol checkout, for `git describe`.
    pub dir: PathBuf,
    /// Navigation entries with exactly this URL are rewritten to the
    /// versioned protocol docs link.
    pub nav_placeholder: String,
}

impl Default for ProtoConfig {
    fn default() -> Self {
        Self {
            site_url: "https://example.github.io/protocol".to_string(),
            dir: PathBuf::from("proto"),
            nav_placeholder: "https://example.github.io/protocol/".to_string(),
        }
    }
}

/// Maven coordinates used by badge macros.
///
/// The artifact name for a module `m` is
/// `{artifact_prefix}{m}{artifact_suffix}`, e.g. prefix `"widgets-"` and
/// suffix `"_3"` yield `widgets-core_3`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MavenConfig {
    /// Maven group ID.
    pub group: String,
    /// Prepended to the module name to form the artifact ID.
    pub artifact_prefix: String,
    /// Appended to the module name to form the artifact ID.
    pub artifact_suffix: String,
}

impl Default for MavenConfig {
    fn default() -> Self {
        Self {
            group: "com.example".to_string(),
            artifact_prefix: String::new(),
            artifact_suffix: String::new(),
        }
    }
}

/// Code snippet embedding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnippetsConfig {
    /// Base directory `code_example()` paths are resolved against.
    pub dir: PathBuf,
    /// Spaces prepended to every line of the embedded block, fences
    /// included (for embedding inside list items).
    pub indent: usize,
}

impl Default for SnippetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("snippets"),
            indent: 0,
        }
    }
}

/// Error-handling policies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// What to do when a release build sees a protocol tag with multiple
    /// hyphens.
    pub malformed_tags: TagPolicy,
}

/// Load config from `docs-macros.toml` in the given directory.
///
/// Returns stock defaults when no config file exists. Unknown keys are
/// rejected and the result is validated.
pub fn load_config(dir: &Path) -> Result<BuildConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    let config: BuildConfig = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        BuildConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `docs-macros.toml` with all keys and
/// explanations. Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docs-macros Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Repository
# ---------------------------------------------------------------------------
[repo]
# Base URL of the repository on its forge (no trailing slash).
# Used by the git_link() macro.
url = "https://github.com/example/project"

# Working directory for `git describe` against the repository itself.
# Only queried for development builds (TAG unset or "dev").
dir = "."

# ---------------------------------------------------------------------------
# Protocol submodule
# ---------------------------------------------------------------------------
[proto]
# Base URL of the published protocol documentation (no trailing slash).
# Used by the proto_link() macro.
site_url = "https://example.github.io/protocol"

# Directory of the protocol checkout, queried with
# `git describe --tags --abbrev=0` unless PROTO_TAG is set.
dir = "proto"

# Navigation entries whose URL equals this placeholder are rewritten to
# the versioned protocol docs link.
nav_placeholder = "https://example.github.io/protocol/"

# ---------------------------------------------------------------------------
# Maven badges
# ---------------------------------------------------------------------------
[maven]
# Group ID for maven_badge() and javadoc_badge().
group = "com.example"

# Artifact ID for module m is "{artifact_prefix}{m}{artifact_suffix}",
# e.g. prefix "widgets-" and suffix "_3" yield "widgets-core_3".
artifact_prefix = ""
artifact_suffix = ""

# ---------------------------------------------------------------------------
# Code snippets
# ---------------------------------------------------------------------------
[snippets]
# Base directory code_example() paths are resolved against.
dir = "snippets"

# Spaces prepended to every embedded line, fences included.
indent = 0

# ---------------------------------------------------------------------------
# Policies
# ---------------------------------------------------------------------------
[policy]
# Release build with a protocol tag containing multiple hyphens:
#   "strict"  -> fail the build
#   "lenient" -> truncate to the first two hyphen-segments and warn
malformed_tags = "strict"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = BuildConfig::default();
        assert_eq!(config.repo.url, "https://github.com/example/project");
        assert_eq!(config.proto.dir, PathBuf::from("proto"));
        assert_eq!(config.snippets.indent, 0);
        assert_eq!(config.policy.malformed_tags, TagPolicy::Strict);
    }

    #[test]
    fn default_config_validates() {
        assert!(BuildConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[policy]
malformed_tags = "lenient"
"#;
        let config: BuildConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.policy.malformed_tags, TagPolicy::Lenient);
        // Defaults preserved
        assert_eq!(config.proto.dir, PathBuf::from("proto"));
        assert_eq!(config.maven.group, "com.example");
    }

    #[test]
    fn parse_full_maven_section() {
        let toml = r#"
[maven]
group = "eu.example.rdf"
artifact_prefix = "widgets-"
artifact_suffix = "_3"
"#;
        let config: BuildConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.maven.group, "eu.example.rdf");
        assert_eq!(config.maven.artifact_prefix, "widgets-");
        assert_eq!(config.maven.artifact_suffix, "_3");
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[repo]
ur = "https://github.com/x/y"
"#;
        let result: Result<BuildConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<BuildConfig, _> = toml::from_str("[repos]\nurl = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn validation_rejects_trailing_slash() {
        let mut config = BuildConfig::default();
        config.repo.url = "https://github.com/x/y/".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validation_rejects_empty_group() {
        let mut config = BuildConfig::default();
        config.maven.group = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.maven.group, "com.example");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[repo]
url = "https://github.com/acme/widgets"
"#,
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.repo.url, "https://github.com/acme/widgets");
        // Unspecified values remain defaults
        assert_eq!(config.proto.dir, PathBuf::from("proto"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "not toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[maven]\ngroup = \"\"\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_toml_is_valid_toml() {
        let _: toml::Value = toml::from_str(stock_config_toml()).expect("stock config must parse");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: BuildConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.repo.url, BuildConfig::default().repo.url);
        assert_eq!(config.policy.malformed_tags, TagPolicy::Strict);
        assert_eq!(config.snippets.dir, PathBuf::from("snippets"));
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        assert!(content.contains("[repo]"));
        assert!(content.contains("[proto]"));
        assert!(content.contains("[maven]"));
        assert!(content.contains("[snippets]"));
        assert!(content.contains("[policy]"));
    }
}
