// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Report struct and public API for the compliance verdict.

mod console;
mod evaluate;
mod validate;

pub use console::summarize_report;
pub use evaluate::evaluate;
pub use validate::{validate_report, CheckStatus};

use serde::Serialize;
use std::path::Path;

use crate::deps::{Artifact, Listing, ListingResult};
use crate::platform::PlatformFacts;
use crate::policy::{applicable_rules, AllowList};

/// Outcome for a single dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict<'a> {
    Allowed { pattern: &'a str },
    Unwanted,
}

#[derive(Debug, Serialize)]
pub struct DependencyVerdict<'a> {
    pub dependency: &'a str,
    pub verdict: Verdict<'a>,
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    platform: &'a PlatformFacts,
    artifact_directory: String,
    artifacts: Vec<&'a str>,
    rules: Vec<&'static str>,
    allowed_patterns: usize,
    dependencies: Vec<DependencyVerdict<'a>>,
    unwanted: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_data: Option<String>,
    status: CheckStatus,
}

impl<'a> Report<'a> {
    /// Create a new report.
    ///
    /// Dependencies are only evaluated when the platform has a policy and the listing delivered
    /// data. With `require_dependencies`, a listing that extracted nothing counts as missing data.
    #[must_use]
    pub fn new(
        facts: &'a PlatformFacts,
        directory: &Path,
        allow_list: &'a AllowList,
        listing: &'a ListingResult<Listing>,
        require_dependencies: bool,
    ) -> Self {
        let supported = !allow_list.is_empty();

        let no_data = match listing {
            Err(error) => Some(error.to_string()),
            Ok(listing) if require_dependencies && listing.dependencies.is_empty() => Some(format!(
                "No dependencies extracted from {} artifact(s)",
                listing.artifacts.len()
            )),
            Ok(_) => None,
        };

        let (dependencies, unwanted) = match listing {
            Ok(listing) if supported => (
                listing
                    .dependencies
                    .iter()
                    .map(|dependency| DependencyVerdict {
                        dependency,
                        verdict: allow_list
                            .covering(dependency)
                            .map_or(Verdict::Unwanted, |pattern| Verdict::Allowed { pattern }),
                    })
                    .collect(),
                evaluate(&listing.dependencies, allow_list),
            ),
            _ => (Vec::new(), Vec::new()),
        };

        let status = CheckStatus::determine(supported, no_data.is_none(), unwanted.is_empty());

        Self {
            platform: facts,
            artifact_directory: directory.display().to_string(),
            artifacts: listing
                .as_ref()
                .map(|listing| listing.artifacts.iter().map(Artifact::name).collect())
                .unwrap_or_default(),
            rules: applicable_rules(facts),
            allowed_patterns: allow_list.len(),
            dependencies,
            unwanted,
            no_data,
            status,
        }
    }

    #[must_use]
    pub fn status(&self) -> CheckStatus {
        self.status
    }

    #[must_use]
    pub fn platform(&self) -> &PlatformFacts {
        self.platform
    }

    /// Dependencies not covered by the allow-list, in first-seen order.
    #[must_use]
    pub fn unwanted(&self) -> &[String] {
        &self.unwanted
    }

    #[must_use]
    pub fn dependencies(&self) -> &[DependencyVerdict<'a>] {
        &self.dependencies
    }

    /// Why no dependency data is available, if it is not.
    #[must_use]
    pub fn no_data(&self) -> Option<&str> {
        self.no_data.as_deref()
    }
}
