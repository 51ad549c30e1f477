// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use linkage_validator::platform::WordSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Print nothing on stdout, only diagnostics on stderr.
    Quiet,
    /// Print summary tables.
    Table,
    /// Print the full report as JSON.
    Json,
}

#[derive(Parser)]
#[command(name = "linkage_validator")]
#[command(version)]
#[command(
    about = "Checks that built binaries only link against the system libraries allowed for the platform"
)]
pub(crate) struct Args {
    /// Directory holding the built binaries and shared libraries.
    pub artifact_directory: PathBuf,

    #[arg(
        long,
        long_help = "Path to the platform facts file.\n\
                Either the two-token text format `<OS> <ARCH>` (e.g. `rhel7 x64`)\n\
                or a JSON document with the extension .json and the fields\n\
                os, distribution, arch and word_size.\n\
                The host platform is used when neither this file nor --os is given."
    )]
    pub facts_file: Option<PathBuf>,

    /// OS token, e.g. `rhel7`, `aix71`, `macos`. Also sets the distribution.
    #[arg(long)]
    pub os: Option<String>,

    /// Distribution identifier, e.g. `ubuntu1804`.
    #[arg(long)]
    pub distribution: Option<String>,

    /// Target architecture, e.g. `x64`, `arm64`, `sparc64`.
    #[arg(long)]
    pub arch: Option<String>,

    /// Pointer width in bits (32 or 64). Derived from the architecture by default.
    #[arg(long)]
    pub word_size: Option<WordSize>,

    /// Introspection tool. Defaults to `otool` on macOS and `ldd` elsewhere.
    #[arg(long)]
    pub tool: Option<String>,

    /// Argument passed to the introspection tool before the artifacts. Repeatable.
    #[arg(long = "tool-arg", allow_hyphen_values = true, requires = "tool")]
    pub tool_args: Vec<String>,

    /// Seconds to wait for the introspection tool.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    #[arg(
        long,
        long_help = "Path to a text file of additionally allowed dependency patterns.\n\
                Each line contains one pattern matched as a substring.\n\
                Empty lines and lines starting with # are ignored.\n\
                Only extends the policy of a supported platform."
    )]
    pub extra_allowed: Option<PathBuf>,

    /// Output written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Quiet)]
    pub format: OutputFormat,

    /// Fail with the no-data status when the tool ran but no dependency was extracted.
    #[arg(long)]
    pub require_dependencies: bool,

    /// Print progress to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}
