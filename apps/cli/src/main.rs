mod build;
mod config;
mod document;
mod errors;
mod html;
mod release;
mod render;
mod state;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::build::summary::BuildSummary;
use crate::config::Config;
use crate::errors::BuildError;
use crate::render::convert::PandocConverter;
use crate::render::markdown::MarkdownRenderer;
use crate::state::BuildContext;

/// Resume artifact pipeline: canonical JSON, per-audience variants, and
/// rendered formats from a single YAML source.
#[derive(Parser, Debug)]
#[command(name = "cvforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the main resume artifacts
    Build,

    /// Build a named variant by overlaying it on the base resume
    Variant {
        /// Variant name (a file under resume/variants/)
        name: Option<String>,
    },

    /// Build a named cover letter against the resume basics
    Cover {
        /// Letter name (a file under resume/cover-letters/)
        name: Option<String>,
    },

    /// Interactively build and tag a release
    Release,
}

fn main() {
    // Load configuration first, then structured logging, then dispatch.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    // Progress and the final summary go to stdout; log output (including
    // non-fatal skip warnings) goes to stderr.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let converter = PandocConverter {
        reference_doc: Some(config.docx_reference()),
    };
    let mut ctx = BuildContext::new(config, MarkdownRenderer::new(), Box::new(converter));

    let result = match cli.command {
        Command::Build => build::build_main(&mut ctx).map(Some),
        Command::Variant { name } => {
            let name = require_name(name, "variant", "cvforge variant apple-ios");
            build::build_variant(&mut ctx, &name).map(Some)
        }
        Command::Cover { name } => {
            let name = require_name(name, "cover", "cvforge cover apple");
            build::build_cover(&mut ctx, &name).map(Some)
        }
        Command::Release => release::run(&mut ctx)
            .map(|_| None)
            .map_err(BuildError::Internal),
    };

    match result {
        Ok(Some(summary)) => print_summary(&summary),
        Ok(None) => {}
        Err(err) => {
            report_failure(&err);
            std::process::exit(1);
        }
    }
}

/// Validates the positional name by hand so a missing name exits 1 with a
/// usage line and an example, matching the pipeline's CLI contract.
fn require_name(name: Option<String>, command: &str, example: &str) -> String {
    match name {
        Some(name) => name,
        None => {
            eprintln!("Usage: cvforge {command} <name>");
            eprintln!("Example: {example}");
            std::process::exit(1);
        }
    }
}

fn report_failure(err: &BuildError) {
    eprintln!("Error: {err}");
    if let BuildError::InputNotFound { alternatives, .. } = err {
        if !alternatives.is_empty() {
            eprintln!("\nAvailable names:");
            for name in alternatives {
                eprintln!("  - {name}");
            }
        }
    }
}

fn print_summary(summary: &BuildSummary) {
    println!("\nBuild summary:");
    print!("{summary}");
}
