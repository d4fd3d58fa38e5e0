//! Version string derivation from git tags and environment overrides.
//!
//! All documentation links and badges hang off four derived strings: the
//! human-facing JVM version, the Maven package version, the protocol tag,
//! and the protocol docs version. Each is a pure function of its inputs —
//! no I/O happens here; callers feed in the env override and the raw
//! `git describe` output (see [`crate::context::BuildContext`]).
//!
//! ## Tag shapes
//!
//! A raw tag comes from `git describe --tags` and looks like one of:
//! - `v1.2.3` — exactly on a release tag
//! - `v1.2.3-4-gabcdef` — 4 commits past `v1.2.3`
//!
//! The literal `"dev"` is the sentinel for "not a release build": links
//! point at the latest development docs instead of a versioned snapshot.
//!
//! ## Malformed tags
//!
//! A protocol tag with more than one hyphen means the protocol checkout is
//! not on a release tag. Release builds treat this per [`TagPolicy`]:
//! `Strict` fails the build, `Lenient` truncates to the first two
//! hyphen-segments and warns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel version for non-release builds.
pub const DEV: &str = "dev";

#[derive(Error, Debug)]
pub enum VersionError {
    #[error(
        "protocol tag '{tag}' has multiple hyphens — the protocol checkout is not on a release tag"
    )]
    MalformedProtoTag { tag: String },
}

/// How to treat a release build whose protocol tag has multiple hyphens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagPolicy {
    /// Fail the build. The default: a release must point at exact versions.
    #[default]
    Strict,
    /// Truncate to the first two hyphen-segments and warn.
    Lenient,
}

/// Warnings collected over one build.
///
/// Every warning is logged through `tracing` the moment it is raised, and
/// kept here so callers (and tests) can see that each condition fired
/// exactly once per build.
#[derive(Debug, Default)]
pub struct Warnings {
    messages: Vec<String>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Strip a single leading `v` from a tag, if present.
///
/// Deliberately not `replace('v', "")`: a tag like `v1.2.3-dev` must keep
/// its inner characters intact.
fn strip_leading_v(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Resolve the JVM version from the `TAG` environment override.
///
/// - absent → `"dev"`, with a warning (docs built outside CI)
/// - `"dev"` → `"dev"`
/// - `"main"` → `"dev"` (branch builds are development builds)
/// - anything else → leading `v` stripped
pub fn jvm_version(tag_env: Option<&str>, warnings: &mut Warnings) -> String {
    match tag_env {
        None => {
            warnings.warn("TAG env var is not set, using dev as default");
            DEV.to_string()
        }
        Some(DEV) | Some("main") => DEV.to_string(),
        Some(tag) => strip_leading_v(tag).to_string(),
    }
}

/// Normalize the raw protocol tag.
///
/// Tags with at most one hyphen pass through unchanged (no `v` stripping
/// here — [`proto_version`] does that). More than one hyphen means the
/// protocol checkout sits between releases:
/// - development build → `"dev"` with a warning
/// - release build → policy decides: [`TagPolicy::Strict`] fails,
///   [`TagPolicy::Lenient`] truncates and warns
pub fn proto_tag(
    raw_tag: &str,
    jvm_version_is_dev: bool,
    policy: TagPolicy,
    warnings: &mut Warnings,
) -> Result<String, VersionError> {
    let hyphens = raw_tag.matches('-').count();
    if hyphens <= 1 {
        return Ok(raw_tag.to_string());
    }
    if jvm_version_is_dev {
        warnings.warn(format!(
            "protocol tag '{raw_tag}' is not a release tag, using dev"
        ));
        return Ok(DEV.to_string());
    }
    match policy {
        TagPolicy::Strict => Err(VersionError::MalformedProtoTag {
            tag: raw_tag.to_string(),
        }),
        TagPolicy::Lenient => {
            let truncated = raw_tag
                .split('-')
                .take(2)
                .collect::<Vec<_>>()
                .join("-");
            warnings.warn(format!(
                "protocol tag '{raw_tag}' is not a release tag, truncating to '{truncated}'"
            ));
            Ok(truncated)
        }
    }
}

/// Resolve the protocol docs version from the JVM version and the
/// normalized protocol tag.
///
/// Development JVM builds always link to the dev protocol docs. A protocol
/// tag that still carries a hyphen after normalization cannot map to a
/// published docs version, so it degrades to `"dev"` with a warning.
pub fn proto_version(jvm_version: &str, proto_tag: &str, warnings: &mut Warnings) -> String {
    if jvm_version == DEV {
        return DEV.to_string();
    }
    if proto_tag.contains('-') {
        warnings.warn(format!(
            "protocol tag '{proto_tag}' has no published docs version, linking to dev"
        ));
        return DEV.to_string();
    }
    strip_leading_v(proto_tag).to_string()
}

/// Resolve the Maven package version.
///
/// Release builds publish under the release version itself. Development
/// builds publish snapshots under the nearest reachable tag, so the
/// distance suffix of the raw describe output is dropped:
/// `v2.0.0-10-gdeadbeef` → `2.0.0`.
pub fn jvm_package_version(jvm_version: &str, jvm_tag_raw: &str) -> String {
    if jvm_version != DEV {
        return jvm_version.to_string();
    }
    let base = jvm_tag_raw.split('-').next().unwrap_or(jvm_tag_raw);
    strip_leading_v(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jvm_version_absent_defaults_to_dev_with_warning() {
        let mut w = Warnings::new();
        assert_eq!(jvm_version(None, &mut w), "dev");
        assert_eq!(w.messages().len(), 1);
        assert!(w.messages()[0].contains("TAG"));
    }

    #[test]
    fn jvm_version_dev_passes_through_without_warning() {
        let mut w = Warnings::new();
        assert_eq!(jvm_version(Some("dev"), &mut w), "dev");
        assert!(w.is_empty());
    }

    #[test]
    fn jvm_version_main_branch_is_dev() {
        let mut w = Warnings::new();
        assert_eq!(jvm_version(Some("main"), &mut w), "dev");
        assert!(w.is_empty());
    }

    #[test]
    fn jvm_version_strips_leading_v() {
        let mut w = Warnings::new();
        assert_eq!(jvm_version(Some("v2.4.0"), &mut w), "2.4.0");
    }

    #[test]
    fn jvm_version_never_returns_leading_v() {
        let mut w = Warnings::new();
        for tag in ["v1.0.0", "v0.1.0-rc1", "v10.20.30"] {
            let out = jvm_version(Some(tag), &mut w);
            assert!(!out.starts_with('v'), "{tag} resolved to {out}");
        }
    }

    #[test]
    fn jvm_version_is_idempotent() {
        let mut w = Warnings::new();
        let a = jvm_version(Some("v1.2.3"), &mut w);
        let b = jvm_version(Some("v1.2.3"), &mut w);
        assert_eq!(a, b);
    }

    #[test]
    fn proto_tag_zero_hyphens_unchanged() {
        let mut w = Warnings::new();
        let out = proto_tag("v1.2.3", false, TagPolicy::Strict, &mut w).unwrap();
        assert_eq!(out, "v1.2.3");
        assert!(w.is_empty());
    }

    #[test]
    fn proto_tag_single_hyphen_unchanged() {
        let mut w = Warnings::new();
        let out = proto_tag("v1.2.3-rc1", false, TagPolicy::Strict, &mut w).unwrap();
        assert_eq!(out, "v1.2.3-rc1");
        assert!(w.is_empty());
    }

    #[test]
    fn proto_tag_multi_hyphen_dev_build_degrades() {
        let mut w = Warnings::new();
        let out = proto_tag("v1.2.3-4-gabc", true, TagPolicy::Strict, &mut w).unwrap();
        assert_eq!(out, "dev");
        assert_eq!(w.messages().len(), 1);
    }

    #[test]
    fn proto_tag_multi_hyphen_release_strict_fails() {
        let mut w = Warnings::new();
        let err = proto_tag("v1.2.3-4-gabc", false, TagPolicy::Strict, &mut w).unwrap_err();
        assert!(matches!(err, VersionError::MalformedProtoTag { .. }));
    }

    #[test]
    fn proto_tag_multi_hyphen_release_lenient_truncates() {
        let mut w = Warnings::new();
        let out = proto_tag("v1.2.3-4-gabc", false, TagPolicy::Lenient, &mut w).unwrap();
        assert_eq!(out, "v1.2.3-4");
        assert_eq!(w.messages().len(), 1);
    }

    #[test]
    fn proto_version_dev_jvm_is_dev() {
        let mut w = Warnings::new();
        assert_eq!(proto_version("dev", "v1.2.3", &mut w), "dev");
        assert!(w.is_empty());
    }

    #[test]
    fn proto_version_hyphenated_tag_degrades_with_warning() {
        let mut w = Warnings::new();
        assert_eq!(proto_version("2.0.0", "v1.2.3-rc1", &mut w), "dev");
        assert_eq!(w.messages().len(), 1);
    }

    #[test]
    fn proto_version_clean_tag_strips_v() {
        let mut w = Warnings::new();
        assert_eq!(proto_version("2.0.0", "v1.2.3", &mut w), "1.2.3");
        assert!(w.is_empty());
    }

    #[test]
    fn package_version_release_passes_through() {
        assert_eq!(jvm_package_version("2.0.0", "ignored"), "2.0.0");
    }

    #[test]
    fn package_version_dev_uses_nearest_tag() {
        assert_eq!(jvm_package_version("dev", "v2.0.0-10-gdeadbeef"), "2.0.0");
    }

    #[test]
    fn package_version_dev_exact_tag() {
        assert_eq!(jvm_package_version("dev", "v2.0.0"), "2.0.0");
    }

    #[test]
    fn tag_policy_default_is_strict() {
        assert_eq!(TagPolicy::default(), TagPolicy::Strict);
    }

    #[test]
    fn tag_policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct P {
            policy: TagPolicy,
        }
        let p: P = toml::from_str("policy = \"lenient\"").unwrap();
        assert_eq!(p.policy, TagPolicy::Lenient);
    }
}
