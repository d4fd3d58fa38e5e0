//! Code snippet embedding for the `code_example()` macro.
//!
//! Snippet files are passed through verbatim into a fenced code block —
//! no transformation beyond trimming trailing blank lines and applying a
//! uniform indent so the block can sit inside a list item. The fence
//! language is guessed from the file extension.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnippetError {
    #[error("cannot read snippet {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Map a file extension to a fence language tag. Unknown extensions are
/// used as-is, which is what most highlighters expect anyway.
fn language_for(extension: &str) -> &str {
    match extension {
        "rs" => "rust",
        "py" => "python",
        "kt" => "kotlin",
        "yml" => "yaml",
        "" => "text",
        other => other,
    }
}

/// Read `base/relative` and render it as an indented fenced code block.
pub fn embed(base: &Path, relative: &str, indent: usize) -> Result<String, SnippetError> {
    let path = base.join(relative);
    let content = fs::read_to_string(&path).map_err(|source| SnippetError::Read {
        path: path.clone(),
        source,
    })?;

    let language = Path::new(relative)
        .extension()
        .and_then(|e| e.to_str())
        .map(language_for)
        .unwrap_or("text");

    let pad = " ".repeat(indent);
    let mut lines: Vec<&str> = content.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    let mut out = String::new();
    out.push_str(&format!("{pad}```{language}\n"));
    for line in lines {
        // Keep blank lines truly blank instead of trailing-whitespace padded
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{pad}{line}\n"));
        }
    }
    out.push_str(&format!("{pad}```"));
    Ok(out)
}
