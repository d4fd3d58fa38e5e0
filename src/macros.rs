//! The macro registry: named functions invocable from documentation text.
//!
//! Every macro is a pure function of the pre-resolved [`BuildContext`] and
//! the [`BuildConfig`] — invocation never queries git or the environment.
//! Link macros produce plain URLs, badge macros produce inline HTML
//! (static-site markdown passes it through), and `code_example` embeds a
//! snippet file as a fenced block.
//!
//! | Macro | Arg | Output |
//! |-------|-----|--------|
//! | `jvm_version` | — | resolved JVM version |
//! | `jvm_package_version` | — | Maven package version |
//! | `proto_version` | — | protocol docs version |
//! | `proto_tag` | — | normalized protocol tag |
//! | `git_tag` | — | raw `TAG`, or `main` |
//! | `git_link` | file path | blob URL at the current tag |
//! | `proto_link` | page path | versioned protocol docs URL |
//! | `maven_badge` | module | Maven Central badge HTML |
//! | `javadoc_badge` | module | javadoc.io badge HTML |
//! | `code_example` | snippet path | fenced code block |

use crate::config::BuildConfig;
use crate::context::BuildContext;
use crate::snippet::{self, SnippetError};
use maud::html;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MacroError {
    #[error("unknown macro '{name}'")]
    Unknown { name: String },
    #[error("macro '{name}' takes no argument")]
    UnexpectedArg { name: String },
    #[error("macro '{name}' requires an argument")]
    MissingArg { name: String },
    #[error(transparent)]
    Snippet(#[from] SnippetError),
}

/// All registered macro names, for diagnostics.
pub const MACRO_NAMES: &[&str] = &[
    "jvm_version",
    "jvm_package_version",
    "proto_version",
    "proto_tag",
    "git_tag",
    "git_link",
    "proto_link",
    "maven_badge",
    "javadoc_badge",
    "code_example",
];

/// Invoke a macro by name.
pub fn invoke(
    name: &str,
    arg: Option<&str>,
    ctx: &BuildContext,
    config: &BuildConfig,
) -> Result<String, MacroError> {
    match name {
        "jvm_version" => no_arg(name, arg, || ctx.versions.jvm_version.clone()),
        "jvm_package_version" => no_arg(name, arg, || ctx.versions.jvm_package_version.clone()),
        "proto_version" => no_arg(name, arg, || ctx.versions.proto_version.clone()),
        "proto_tag" => no_arg(name, arg, || ctx.versions.proto_tag.clone()),
        "git_tag" => no_arg(name, arg, || ctx.git_tag().to_string()),
        "git_link" => {
            let file = require_arg(name, arg)?;
            Ok(format!(
                "{}/blob/{}/{}",
                config.repo.url,
                ctx.git_tag(),
                file
            ))
        }
        "proto_link" => {
            let page = require_arg(name, arg)?;
            Ok(proto_link(config, &ctx.versions.proto_version, page))
        }
        "maven_badge" => {
            let module = require_arg(name, arg)?;
            Ok(maven_badge(config, module))
        }
        "javadoc_badge" => {
            let module = require_arg(name, arg)?;
            Ok(javadoc_badge(config, module))
        }
        "code_example" => {
            let path = require_arg(name, arg)?;
            Ok(snippet::embed(
                &config.snippets.dir,
                path,
                config.snippets.indent,
            )?)
        }
        _ => Err(MacroError::Unknown {
            name: name.to_string(),
        }),
    }
}

fn no_arg(
    name: &str,
    arg: Option<&str>,
    value: impl FnOnce() -> String,
) -> Result<String, MacroError> {
    if arg.is_some() {
        return Err(MacroError::UnexpectedArg {
            name: name.to_string(),
        });
    }
    Ok(value())
}

fn require_arg<'a>(name: &str, arg: Option<&'a str>) -> Result<&'a str, MacroError> {
    arg.ok_or_else(|| MacroError::MissingArg {
        name: name.to_string(),
    })
}

/// Versioned protocol docs URL. An empty page links to the version root.
pub fn proto_link(config: &BuildConfig, proto_version: &str, page: &str) -> String {
    format!("{}/{}/{}", config.proto.site_url, proto_version, page)
}

fn artifact_id(config: &BuildConfig, module: &str) -> String {
    format!(
        "{}{}{}",
        config.maven.artifact_prefix, module, config.maven.artifact_suffix
    )
}

/// Maven Central badge: shields.io image linking to the artifact page.
fn maven_badge(config: &BuildConfig, module: &str) -> String {
    let group = &config.maven.group;
    let artifact = artifact_id(config, module);
    let shield = format!("https://img.shields.io/maven-central/v/{group}/{artifact}?label=Maven%20Central");
    let target = format!("https://central.sonatype.com/artifact/{group}/{artifact}");
    html! {
        a href=(target) {
            img src=(shield) alt="Maven Central";
        }
    }
    .into_string()
}

/// javadoc.io badge for the module's published API docs.
fn javadoc_badge(config: &BuildConfig, module: &str) -> String {
    let group = &config.maven.group;
    let artifact = artifact_id(config, module);
    let shield = format!("https://javadoc.io/badge2/{group}/{artifact}/javadoc.svg");
    let target = format!("https://javadoc.io/doc/{group}/{artifact}");
    html! {
        a href=(target) {
            img src=(shield) alt="javadoc";
        }
    }
    .into_string()
}
