//! Release flow — interactive tagging of a main or variant build.
//!
//! Blocks on stdin (no timeout) and requires explicit confirmation before
//! building and creating the git tag. A failed build never leaves a tag
//! behind: tagging happens strictly after every build step succeeds.

use std::io::{self, BufRead, Write};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::build;
use crate::document::catalog::Catalog;
use crate::state::BuildContext;

/// Version offered when the repository has no tags yet.
const FALLBACK_VERSION: &str = "v2026.1.0";

pub fn run(ctx: &mut BuildContext) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Resume release tool\n");
    println!("Current version: {}\n", current_version());

    println!("What would you like to release?");
    println!("  1. Main resume (e.g. v2026.1.1)");
    println!("  2. Variant resume (e.g. v2026.1.1-apple)");
    println!("  3. List available variants");
    println!("  4. Cancel");

    let choice = prompt(&mut input, "\nEnter choice (1-4): ")?;
    match choice.as_str() {
        "4" => {
            println!("Cancelled");
            return Ok(());
        }
        "3" => {
            println!("\nAvailable variants:");
            let names = Catalog::new(ctx.config.variants_dir()).names();
            if names.is_empty() {
                println!("  (none found)");
            }
            for name in names {
                println!("  - {name}");
            }
            return Ok(());
        }
        "1" | "2" => {}
        other => bail!("unrecognized choice: {other}"),
    }

    let version = prompt(&mut input, "\nEnter new version (e.g. v2026.1.1): ")?;
    if !version.starts_with('v') {
        bail!("version must start with 'v'");
    }

    let mut tag = version.clone();
    let mut variant = None;
    if choice == "2" {
        let name = prompt(&mut input, "Enter variant name (e.g. apple-ios): ")?;
        if Catalog::new(ctx.config.variants_dir()).resolve(&name).is_err() {
            bail!("variant '{name}' not found");
        }
        tag = format!("{version}-{name}");
        variant = Some(name);
    }

    println!("\nCreating release: {tag}");
    if let Some(name) = &variant {
        println!("Variant: {name}");
    }
    let confirm = prompt(&mut input, "\nProceed? (y/n): ")?;
    if !confirm.eq_ignore_ascii_case("y") {
        println!("Cancelled");
        return Ok(());
    }

    let summary = build::build_main(ctx).context("main build failed")?;
    print!("{summary}");
    if let Some(name) = &variant {
        let summary = build::build_variant(ctx, name).context("variant build failed")?;
        print!("{summary}");
        // A cover letter sharing the variant's name rides along.
        if Catalog::new(ctx.config.cover_letters_dir()).resolve(name).is_ok() {
            let summary = build::build_cover(ctx, name).context("cover letter build failed")?;
            print!("{summary}");
        }
    }

    let message = prompt(&mut input, "Tag message (optional): ")?;
    create_tag(&tag, &message)?;
    info!("created release tag {tag}");
    println!("\nRelease tag created: {tag}");
    println!("  git push origin {tag}");
    Ok(())
}

fn prompt(input: &mut impl BufRead, text: &str) -> Result<String> {
    print!("{text}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("failed to read input")?;
    Ok(line.trim().to_string())
}

/// Latest version tag, or the fallback when the repo has none.
fn current_version() -> String {
    let output = Command::new("git")
        .args(["tag", "--sort=-version:refname"])
        .output();
    let Ok(output) = output else {
        return FALLBACK_VERSION.to_string();
    };
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|tag| !tag.is_empty())
        .map(String::from)
        .unwrap_or_else(|| FALLBACK_VERSION.to_string())
}

fn create_tag(tag: &str, message: &str) -> Result<()> {
    let mut command = Command::new("git");
    if message.is_empty() {
        command.args(["tag", tag]);
    } else {
        command.args(["tag", "-a", tag, "-m", message]);
    }
    let status = command.status().context("failed to run git")?;
    if !status.success() {
        bail!("git tag exited with {status}");
    }
    Ok(())
}
