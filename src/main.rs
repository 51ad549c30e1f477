// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
mod args;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use args::{Args, OutputFormat};
use linkage_validator::deps::{collect_dependencies, Listing, ListingResult, ToolCommand};
use linkage_validator::platform::{FactsOverrides, PlatformFacts};
use linkage_validator::policy::{resolve_allow_list, AllowList};
use linkage_validator::report::{summarize_report, validate_report, CheckStatus, Report};

/// Exit code for unusable configuration: bad facts file or unreadable extra-allowed file.
const CONFIGURATION_ERROR: u8 = 5;

macro_rules! progress {
    ($args:expr, $($message:tt)*) => {
        if $args.verbose {
            eprintln!($($message)*);
        }
    };
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(CONFIGURATION_ERROR)
        }
    }
}

fn run(args: &Args) -> Result<CheckStatus> {
    let facts = resolve_platform(args)?;
    let allow_list = create_allow_list(args, &facts)?;
    let listing = list_dependencies(args, &facts);

    let report = Report::new(
        &facts,
        &args.artifact_directory,
        &allow_list,
        &listing,
        args.require_dependencies,
    );
    match args.format {
        OutputFormat::Quiet => {}
        OutputFormat::Table => summarize_report(&report),
        OutputFormat::Json => write_report(&report)?,
    }

    let status = validate_report(&report);
    progress!(args, "Check completed: status={status:?}, exit_code={}", status.exit_code());
    Ok(status)
}

/// Build the platform facts from the flags, the facts file or the host.
///
/// # Errors
/// Returns an error if the facts file cannot be read or parsed.
fn resolve_platform(args: &Args) -> Result<PlatformFacts> {
    let overrides = FactsOverrides {
        os: args.os.clone(),
        distribution: args.distribution.clone(),
        architecture: args.arch.clone(),
        word_size: args.word_size,
    };
    let facts = PlatformFacts::resolve(args.facts_file.as_deref(), &overrides)
        .context("Failed to determine the platform")?;
    progress!(args, "Resolved platform: platform={facts}");
    Ok(facts)
}

/// Resolve the allow-list for the platform, extended by the extra-allowed file.
///
/// # Errors
/// Returns an error if the extra-allowed file cannot be read.
fn create_allow_list(args: &Args, facts: &PlatformFacts) -> Result<AllowList> {
    let mut allow_list = resolve_allow_list(facts);
    progress!(
        args,
        "Resolved allow-list: platform={facts}, patterns={}",
        allow_list.len()
    );

    if let Some(path) = &args.extra_allowed {
        let extra = AllowList::from_file(path)?;
        // An unsupported platform stays unsupported.
        if !allow_list.is_empty() {
            progress!(
                args,
                "Extending allow-list: file={}, patterns={}",
                path.display(),
                extra.len()
            );
            allow_list.extend(extra.iter());
        }
    }
    Ok(allow_list)
}

fn list_dependencies(args: &Args, facts: &PlatformFacts) -> ListingResult<Listing> {
    let tool = args.tool.as_ref().map_or_else(
        || ToolCommand::for_platform(facts),
        |program| ToolCommand::new(program.clone(), args.tool_args.clone()),
    );
    progress!(
        args,
        "Listing dependencies: directory={}, tool={}",
        args.artifact_directory.display(),
        tool.program()
    );

    let listing = collect_dependencies(
        &tool,
        &args.artifact_directory,
        facts,
        Duration::from_secs(args.timeout),
    );
    if let Ok(listing) = &listing {
        progress!(
            args,
            "Listing completed: artifacts={}, dependencies={}",
            listing.artifacts.len(),
            listing.dependencies.len()
        );
    }
    listing
}

/// Write the report as pretty JSON to stdout.
///
/// # Errors
/// Returns an error if the report cannot be serialized or written.
fn write_report(report: &Report<'_>) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, report)
        .context("Failed to serialize report to JSON")?;
    writeln!(stdout).context("Failed to write report")?;
    Ok(())
}

