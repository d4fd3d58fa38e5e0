//! # docs-macros
//!
//! Documentation build helper for a JVM project with a protocol submodule.
//! It resolves version strings from git tags and environment variables,
//! expands `{{ macro(...) }}` calls in markdown sources, rewrites the
//! placeholder protocol entry in the site navigation, and embeds code
//! snippets — everything the static-site generator needs that depends on
//! "which version is this build".
//!
//! # Architecture: Resolve Once, Expand Everywhere
//!
//! ```text
//! 1. Resolve   env + git describe  →  BuildContext   (versions, warnings)
//! 2. Expand    docs/*.md           →  out/*.md       (macros substituted)
//! 3. Rewrite   mkdocs.yml nav      →  versioned protocol link
//! ```
//!
//! Version resolution happens exactly once per build: [`context::BuildContext`]
//! runs each `git describe` query at most once and every macro reads the
//! pre-resolved strings. This keeps macros pure, keeps warnings from
//! repeating per page, and makes a failed tag query fail the build before
//! any file is touched.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`version`] | The four version-derivation functions and the malformed-tag policy |
//! | [`git`] | `git describe` queries; failures are fatal with exit code + stderr |
//! | [`context`] | Per-build resolution: env + tags → [`context::ResolvedVersions`] |
//! | [`macros`] | Macro registry: versions, links, badges, snippet embedding |
//! | [`expand`] | `{{ ... }}` scanner and the docs-tree expansion pass |
//! | [`nav`] | Typed placeholder rewrite over the site config's `nav` list |
//! | [`snippet`] | Fenced-block embedding of example source files |
//! | [`config`] | `docs-macros.toml` loading, validation, stock defaults |
//!
//! # Design Decisions
//!
//! ## Explicit BuildContext Over Cached Globals
//!
//! The macros this replaces cached tags in module-level globals. Here the
//! cache is a value constructed once in `main` and passed down, so tests
//! can build one from literals and the "describe runs once per build"
//! guarantee is visible in the types instead of hidden in lazy statics.
//!
//! ## Strict Tags By Default
//!
//! A release build whose protocol checkout is not on a release tag fails
//! by default ([`version::TagPolicy::Strict`]). The historical alternative
//! of truncating the tag and warning survives as `"lenient"` in the
//! config, for doc builds that must go out even when the submodule lags.
//!
//! ## Maud For Badge Markup
//!
//! Badges are the only HTML this tool emits. They go through
//! [Maud](https://maud.lambda.xyz/) rather than `format!` so URLs and
//! module names are escaped by construction.

pub mod config;
pub mod context;
pub mod expand;
pub mod git;
pub mod macros;
pub mod nav;
pub mod snippet;
pub mod version;
