//! Template expansion over documentation sources.
//!
//! Markdown files may contain macro calls in double-brace syntax:
//!
//! ```text
//! The current release is {{ jvm_version }}.
//! See [the format spec]({{ proto_link("specification/") }}).
//! ```
//!
//! A call is a macro name optionally followed by a single double-quoted
//! string argument in parentheses. Everything outside `{{ ... }}` passes
//! through byte-for-byte — including fenced code blocks, matching the site
//! generator this feeds. The scanner is hand-rolled: the grammar is two
//! tokens deep and a regex would hide the line tracking.
//!
//! [`expand_dir`] walks a source tree, expands every `.md` file into the
//! output tree and copies everything else verbatim. [`check_dir`] runs the
//! same pass without writing, for validation.

use crate::config::{BuildConfig, CONFIG_FILENAME};
use crate::context::BuildContext;
use crate::macros::{self, MacroError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("line {line}: unterminated '{{{{' macro call")]
    Unterminated { line: usize },
    #[error("line {line}: cannot parse macro call '{call}'")]
    BadSyntax { line: usize, call: String },
    #[error("line {line}: {source}")]
    Macro {
        line: usize,
        #[source]
        source: MacroError,
    },
    #[error("{path}: {source}")]
    Page {
        path: PathBuf,
        #[source]
        source: Box<ExpandError>,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Counts reported after a directory pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpandStats {
    /// Markdown pages expanded.
    pub pages: usize,
    /// Non-markdown files copied through.
    pub copied: usize,
}

/// Expand every macro call in `text`.
pub fn expand_str(
    text: &str,
    ctx: &BuildContext,
    config: &BuildConfig,
) -> Result<String, ExpandError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut line = 1;

    while let Some(start) = rest.find("{{") {
        let head = &rest[..start];
        out.push_str(head);
        line += head.matches('\n').count();

        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or(ExpandError::Unterminated { line })?;
        let call = after[..end].trim();
        let (name, arg) = parse_call(call).ok_or_else(|| ExpandError::BadSyntax {
            line,
            call: call.to_string(),
        })?;
        let value = macros::invoke(name, arg, ctx, config)
            .map_err(|source| ExpandError::Macro { line, source })?;
        out.push_str(&value);

        line += after[..end].matches('\n').count();
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Parse the inside of a `{{ ... }}` call: `name` or `name("arg")`.
///
/// Returns `None` on anything else — empty calls, unquoted arguments,
/// trailing junk.
fn parse_call(call: &str) -> Option<(&str, Option<&str>)> {
    let name_end = call
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(call.len());
    let (name, tail) = call.split_at(name_end);
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let tail = tail.trim_start();
    if tail.is_empty() {
        return Some((name, None));
    }
    let inner = tail.strip_prefix('(')?.strip_suffix(')')?.trim();
    let arg = inner.strip_prefix('"')?.strip_suffix('"')?;
    if arg.contains('"') {
        return None;
    }
    Some((name, Some(arg)))
}

/// Expand a single markdown file to a string, tagging errors with the path.
pub fn expand_file(
    path: &Path,
    ctx: &BuildContext,
    config: &BuildConfig,
) -> Result<String, ExpandError> {
    let text = fs::read_to_string(path).map_err(ExpandError::Io)?;
    expand_str(&text, ctx, config).map_err(|source| ExpandError::Page {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Walk `source`, expand every `.md` into `output` (other files are copied
/// verbatim, the tool config file is skipped).
pub fn expand_dir(
    source: &Path,
    output: &Path,
    ctx: &BuildContext,
    config: &BuildConfig,
) -> Result<ExpandStats, ExpandError> {
    process_dir(source, Some(output), ctx, config)
}

/// Same pass as [`expand_dir`] but nothing is written.
pub fn check_dir(
    source: &Path,
    ctx: &BuildContext,
    config: &BuildConfig,
) -> Result<ExpandStats, ExpandError> {
    process_dir(source, None, ctx, config)
}

fn process_dir(
    source: &Path,
    output: Option<&Path>,
    ctx: &BuildContext,
    config: &BuildConfig,
) -> Result<ExpandStats, ExpandError> {
    let mut stats = ExpandStats::default();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name() == CONFIG_FILENAME {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(source)
            .expect("walkdir yields paths under its root");

        let is_markdown = entry
            .path()
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("md"));

        if is_markdown {
            let expanded = expand_file(entry.path(), ctx, config)?;
            if let Some(out_root) = output {
                let dest = out_root.join(rel);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&dest, expanded)?;
            }
            stats.pages += 1;
        } else {
            if let Some(out_root) = output {
                let dest = out_root.join(rel);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                // Copy assets through untouched
                fs::copy(entry.path(), &dest)?;
            }
            stats.copied += 1;
        }
    }
    Ok(stats)
}
