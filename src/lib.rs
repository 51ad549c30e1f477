// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! A tool for checking that built binaries only link against allowed system libraries.
//!
//! This crate provides functionality to:
//! - Describe the build target platform (OS family, distribution, architecture, word size)
//! - List the shared-library dependencies of the built artifacts with the native tool
//! - Resolve the allow-list of system libraries for the platform
//! - Evaluate the dependencies and map the verdict to an exit code

pub mod deps;
pub mod platform;
pub mod policy;
pub mod report;

// Re-export key types for convenience
pub use deps::{DependencySet, Listing, ToolCommand};
pub use platform::PlatformFacts;
pub use policy::AllowList;
pub use report::{CheckStatus, Report};
