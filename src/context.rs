//! Per-build resolution context.
//!
//! The version macros used to share module-level cached globals; here the
//! cache is explicit. A [`BuildContext`] is constructed exactly once per
//! documentation build, runs each `git describe` query at most once, and is
//! then passed to every macro invocation. Macros read pre-resolved strings —
//! they never touch the environment or spawn processes themselves.
//!
//! ## Resolution order
//!
//! 1. `TAG` env → JVM version (warning when unset).
//! 2. For development builds only, `git describe --tags` in the repo dir
//!    supplies the raw tag the package version falls back to. Release
//!    builds derive everything from `TAG` and never shell out here.
//! 3. `PROTO_TAG` env, or `git describe --tags --abbrev=0` in the protocol
//!    dir, supplies the raw protocol tag, which is then normalized per the
//!    configured [`TagPolicy`](crate::version::TagPolicy).
//!
//! Any describe failure aborts resolution; there is no fallback.

use crate::config::BuildConfig;
use crate::git::{self, DescribeMode, GitError};
use crate::version::{self, DEV, VersionError, Warnings};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error(transparent)]
    Git(#[from] GitError),
    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Environment inputs to version resolution.
///
/// Separated from `std::env` so tests can inject values without mutating
/// process state.
#[derive(Debug, Clone, Default)]
pub struct Env {
    /// `TAG`: release tag override.
    pub tag: Option<String>,
    /// `PROTO_TAG`: protocol tag override.
    pub proto_tag: Option<String>,
}

impl Env {
    /// Read `TAG` and `PROTO_TAG` from the process environment.
    pub fn from_process() -> Self {
        Self {
            tag: std::env::var("TAG").ok(),
            proto_tag: std::env::var("PROTO_TAG").ok(),
        }
    }
}

/// The four derived version strings every link and badge is built from.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedVersions {
    /// Human-facing JVM version (`"dev"` or `MAJOR.MINOR.PATCH`).
    pub jvm_version: String,
    /// Maven package version (nearest release for dev builds).
    pub jvm_package_version: String,
    /// Normalized protocol tag (may keep its leading `v`).
    pub proto_tag: String,
    /// Protocol docs version (`"dev"` or cleaned tag).
    pub proto_version: String,
}

/// Everything one documentation build needs from git and the environment.
#[derive(Debug)]
pub struct BuildContext {
    /// Raw `TAG` value, kept for the `git_tag` / `git_link` macros.
    pub tag_env: Option<String>,
    pub versions: ResolvedVersions,
    pub warnings: Warnings,
}

impl BuildContext {
    /// Resolve all version strings for one build.
    ///
    /// Runs each external tag query at most once. Warnings accumulate in
    /// the returned context, so each condition is reported exactly once
    /// per build regardless of how many macros consume the result.
    pub fn resolve(config: &BuildConfig, env: &Env) -> Result<Self, ContextError> {
        let mut warnings = Warnings::new();

        let jvm_version = version::jvm_version(env.tag.as_deref(), &mut warnings);
        let jvm_is_dev = jvm_version == DEV;

        // The package version only needs the repo tag when falling back
        // from "dev"; release builds already carry the version in TAG.
        let jvm_tag_raw = if jvm_is_dev {
            git::describe(&config.repo.dir, DescribeMode::WithDistance)?
        } else {
            env.tag.clone().unwrap_or_default()
        };

        let proto_raw = match &env.proto_tag {
            Some(tag) => tag.clone(),
            None => git::describe(&config.proto.dir, DescribeMode::TagOnly)?,
        };

        let proto_tag = version::proto_tag(
            &proto_raw,
            jvm_is_dev,
            config.policy.malformed_tags,
            &mut warnings,
        )?;
        let proto_version = version::proto_version(&jvm_version, &proto_tag, &mut warnings);
        let jvm_package_version = version::jvm_package_version(&jvm_version, &jvm_tag_raw);

        Ok(Self {
            tag_env: env.tag.clone(),
            versions: ResolvedVersions {
                jvm_version,
                jvm_package_version,
                proto_tag,
                proto_version,
            },
            warnings,
        })
    }

    /// The raw tag used in repository links: `TAG` as-is, or `main` when
    /// unset (development links point at the main branch, not a tag).
    pub fn git_tag(&self) -> &str {
        self.tag_env.as_deref().unwrap_or("main")
    }
}
