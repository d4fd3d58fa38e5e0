use clap::{Parser, Subcommand};
use docs_macros::{config, context, expand, nav};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docs-macros")]
#[command(about = "Documentation build helper: version macros for markdown sources")]
#[command(long_about = "\
Documentation build helper: version macros for markdown sources

Resolves version strings from git tags and environment variables, then
expands {{ macro(...) }} calls in markdown files, rewrites the placeholder
protocol entry in the site navigation, and embeds code snippets.

Environment:
  TAG         Release tag override. Unset or 'dev' or 'main' -> development
              build; anything else is the release tag (leading 'v' stripped
              for display).
  PROTO_TAG   Protocol tag override. When unset, the protocol checkout is
              queried with `git describe --tags --abbrev=0`.

Macros available in markdown sources:
  {{ jvm_version }}            {{ jvm_package_version }}
  {{ proto_version }}          {{ proto_tag }}
  {{ git_tag }}                {{ git_link(\"path/in/repo\") }}
  {{ proto_link(\"page/\") }}    {{ maven_badge(\"module\") }}
  {{ javadoc_badge(\"module\") }} {{ code_example(\"File.java\") }}

Run 'docs-macros gen-config' to generate a documented docs-macros.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Documentation source directory (holds docs-macros.toml)
    #[arg(long, default_value = "docs", global = true)]
    source: PathBuf,

    /// Output directory for expanded sources
    #[arg(long, default_value = "docs-build", global = true)]
    output: PathBuf,

    /// Site config whose nav placeholder gets rewritten
    #[arg(long, default_value = "mkdocs.yml", global = true)]
    site_config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Expand macros into the output directory and rewrite the navigation
    Build,
    /// Resolve versions and expand everything without writing
    Check,
    /// Print the resolved version strings
    Resolve {
        /// Emit JSON instead of the plain listing
        #[arg(long)]
        json: bool,
    },
    /// Print a stock docs-macros.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.source)?;
            let env = context::Env::from_process();
            let ctx = context::BuildContext::resolve(&config, &env)?;
            println!(
                "==> Versions: jvm {} / package {} / proto {}",
                ctx.versions.jvm_version,
                ctx.versions.jvm_package_version,
                ctx.versions.proto_version
            );

            let stats = expand::expand_dir(&cli.source, &cli.output, &ctx, &config)?;
            println!(
                "==> Expanded {} pages, copied {} files → {}",
                stats.pages,
                stats.copied,
                cli.output.display()
            );

            if cli.site_config.exists() {
                let link =
                    docs_macros::macros::proto_link(&config, &ctx.versions.proto_version, "");
                let rewritten = nav::rewrite_nav_file(
                    &cli.site_config,
                    &config.proto.nav_placeholder,
                    &link,
                )?;
                println!(
                    "==> Navigation: {} placeholder link(s) rewritten in {}",
                    rewritten,
                    cli.site_config.display()
                );
            }

            println!("==> Build complete");
        }
        Command::Check => {
            let config = config::load_config(&cli.source)?;
            let env = context::Env::from_process();
            let ctx = context::BuildContext::resolve(&config, &env)?;
            let stats = expand::check_dir(&cli.source, &ctx, &config)?;
            println!(
                "==> {} pages expand cleanly ({} other files)",
                stats.pages, stats.copied
            );
            if !ctx.warnings.is_empty() {
                println!("==> {} warning(s), logged above", ctx.warnings.messages().len());
            }
            println!("==> Docs are valid");
        }
        Command::Resolve { json } => {
            let config = config::load_config(&cli.source)?;
            let env = context::Env::from_process();
            let ctx = context::BuildContext::resolve(&config, &env)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ctx.versions)?);
            } else {
                println!("jvm_version          {}", ctx.versions.jvm_version);
                println!("jvm_package_version  {}", ctx.versions.jvm_package_version);
                println!("proto_tag            {}", ctx.versions.proto_tag);
                println!("proto_version        {}", ctx.versions.proto_version);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
