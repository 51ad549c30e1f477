// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Lists and extracts the shared-library dependencies of the built artifacts.

mod artifacts;
mod lister;
mod parser;

pub use artifacts::{find_artifacts, Artifact};
pub use lister::{
    list_dependencies, ListingError, ListingResult, ToolCommand, ToolOutput, DEFAULT_TOOL_TIMEOUT,
};
pub use parser::{extract, LineFormat};

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::platform::PlatformFacts;

/// Dependencies extracted from one run of the introspection tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub artifacts: Vec<Artifact>,
    pub dependencies: DependencySet,
}

/// Discover the artifacts in `directory`, run the tool over them and extract the dependencies.
///
/// A tool that exits non-zero still delivers data when its output names dependencies, or when it
/// only complained about static artifacts.
///
/// # Errors
/// Returns an error if the directory cannot be read, holds no binary artifacts, or the tool does
/// not deliver output.
pub fn collect_dependencies(
    tool: &ToolCommand,
    directory: &Path,
    facts: &PlatformFacts,
    timeout: Duration,
) -> ListingResult<Listing> {
    let artifacts = find_artifacts(directory)?;
    let output = list_dependencies(tool, directory, &artifacts, timeout)?;
    let dependencies = extract(output.lines(), facts);
    if !output.success() && dependencies.is_empty() && !parser::is_noise_only(output.stderr()) {
        return Err(output.into_exit_error());
    }
    Ok(Listing {
        artifacts,
        dependencies,
    })
}

/// Deduplicated set of dependency identifiers, kept in first-seen order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DependencySet {
    dependencies: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl DependencySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency. Returns `false` if it was already present.
    pub fn insert(&mut self, dependency: impl Into<String>) -> bool {
        let dependency = dependency.into();
        if self.seen.contains(&dependency) {
            return false;
        }
        self.seen.insert(dependency.clone());
        self.dependencies.push(dependency);
        true
    }

    #[must_use]
    pub fn contains(&self, dependency: &str) -> bool {
        self.seen.contains(dependency)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(String::as_str)
    }
}

// Sets are equal when they hold the same dependencies, regardless of order.
impl PartialEq for DependencySet {
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl Eq for DependencySet {}

impl<S: Into<String>> FromIterator<S> for DependencySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for dependency in iter {
            set.insert(dependency);
        }
        set
    }
}
