//! Navigation rewriting for the site config.
//!
//! The static-site config carries a `nav` sequence where every item is a
//! single-key mapping: `- Label: url-or-nested-list`. The protocol docs
//! entry is kept as a fixed placeholder URL in the committed config so the
//! file stays buildable by hand; at build time every entry matching the
//! placeholder is rewritten to the versioned protocol docs link.
//!
//! The pass is typed: leaf entries become [`NavEntry`] values rather than
//! being poked at as raw YAML, and nested sections are traversed
//! recursively. Everything else in the config file is left untouched.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("cannot read site config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write site config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("site config has no 'nav' sequence")]
    MissingNav,
}

/// A leaf navigation entry: one label mapped to one URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavEntry {
    pub label: String,
    pub url: String,
}

impl NavEntry {
    /// Extract a leaf entry from a single-key mapping whose value is a
    /// string. Section headers (nested lists) and bare strings return
    /// `None` — they are not link entries.
    fn from_value(value: &Value) -> Option<NavEntry> {
        let mapping = value.as_mapping()?;
        if mapping.len() != 1 {
            return None;
        }
        let (key, val) = mapping.iter().next()?;
        Some(NavEntry {
            label: key.as_str()?.to_string(),
            url: val.as_str()?.to_string(),
        })
    }
}

/// Rewrite every entry in `items` whose URL equals `placeholder` to
/// `replacement`, recursing into nested sections. Returns the number of
/// entries rewritten.
pub fn rewrite_items(items: &mut [Value], placeholder: &str, replacement: &str) -> usize {
    let mut rewritten = 0;
    for item in items {
        if let Some(entry) = NavEntry::from_value(item) {
            if entry.url == placeholder {
                let mut mapping = Mapping::new();
                mapping.insert(
                    Value::String(entry.label),
                    Value::String(replacement.to_string()),
                );
                *item = Value::Mapping(mapping);
                rewritten += 1;
            }
        } else if let Some(mapping) = item.as_mapping_mut() {
            // Section header: single key mapped to a nested list
            for (_, val) in mapping.iter_mut() {
                if let Value::Sequence(children) = val {
                    rewritten += rewrite_items(children, placeholder, replacement);
                }
            }
        }
    }
    rewritten
}

/// Load the site config at `path`, rewrite placeholder nav entries, and
/// write it back. Returns the number of entries rewritten.
///
/// A config without a `nav` sequence is an error: this tool exists to
/// version that entry, so its absence means the wrong file was passed.
pub fn rewrite_nav_file(
    path: &Path,
    placeholder: &str,
    replacement: &str,
) -> Result<usize, NavError> {
    let content = fs::read_to_string(path).map_err(|source| NavError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: Value = serde_yaml::from_str(&content)?;

    let nav = config
        .get_mut("nav")
        .and_then(Value::as_sequence_mut)
        .ok_or(NavError::MissingNav)?;
    let rewritten = rewrite_items(nav, placeholder, replacement);

    let serialized = serde_yaml::to_string(&config)?;
    fs::write(path, serialized).map_err(|source| NavError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PLACEHOLDER: &str = "https://example.github.io/protocol/";
    const REPLACEMENT: &str = "https://example.github.io/protocol/1.4.0/";

    fn nav_values(yaml: &str) -> Vec<Value> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn rewrites_matching_top_level_entry() {
        let mut items = nav_values(
            "- Home: index.md\n- Protocol: https://example.github.io/protocol/\n",
        );
        let n = rewrite_items(&mut items, PLACEHOLDER, REPLACEMENT);
        assert_eq!(n, 1);
        let entry = NavEntry::from_value(&items[1]).unwrap();
        assert_eq!(entry.label, "Protocol");
        assert_eq!(entry.url, REPLACEMENT);
    }

    #[test]
    fn leaves_other_entries_alone() {
        let mut items = nav_values("- Home: index.md\n- About: about.md\n");
        let n = rewrite_items(&mut items, PLACEHOLDER, REPLACEMENT);
        assert_eq!(n, 0);
        assert_eq!(
            NavEntry::from_value(&items[0]).unwrap().url,
            "index.md"
        );
    }

    #[test]
    fn recurses_into_nested_sections() {
        let mut items = nav_values(
            "- Home: index.md\n- Reference:\n    - API: api.md\n    - Protocol: https://example.github.io/protocol/\n",
        );
        let n = rewrite_items(&mut items, PLACEHOLDER, REPLACEMENT);
        assert_eq!(n, 1);
    }

    #[test]
    fn nav_entry_ignores_section_headers() {
        let items = nav_values("- Section:\n    - A: a.md\n");
        assert_eq!(NavEntry::from_value(&items[0]), None);
    }

    #[test]
    fn rewrite_nav_file_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mkdocs.yml");
        fs::write(
            &path,
            "site_name: Example\nnav:\n- Home: index.md\n- Protocol: https://example.github.io/protocol/\n",
        )
        .unwrap();

        let n = rewrite_nav_file(&path, PLACEHOLDER, REPLACEMENT).unwrap();
        assert_eq!(n, 1);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains(REPLACEMENT));
        // The rest of the config survives the roundtrip
        assert!(written.contains("site_name: Example"));
        assert!(written.contains("Home: index.md"));
    }

    #[test]
    fn missing_nav_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mkdocs.yml");
        fs::write(&path, "site_name: Example\n").unwrap();
        assert!(matches!(
            rewrite_nav_file(&path, PLACEHOLDER, REPLACEMENT),
            Err(NavError::MissingNav)
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.yml");
        let err = rewrite_nav_file(&path, PLACEHOLDER, REPLACEMENT).unwrap_err();
        assert!(err.to_string().contains("absent.yml"));
    }
}
