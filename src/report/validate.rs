// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Maps the report to a check status, exit code and diagnostics.

use serde::Serialize;

use super::Report;

/// Final verdict of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Compliant,
    UnwantedDependencies,
    UnsupportedPlatform,
    NoDependencyData,
}

impl CheckStatus {
    /// Unsupported platform wins over missing data, which wins over unwanted dependencies.
    pub(crate) fn determine(supported: bool, has_data: bool, clean: bool) -> Self {
        if !supported {
            Self::UnsupportedPlatform
        } else if !has_data {
            Self::NoDependencyData
        } else if !clean {
            Self::UnwantedDependencies
        } else {
            Self::Compliant
        }
    }

    /// Process exit code. 2 is left to usage errors and 5 to configuration errors.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Compliant => 0,
            Self::UnwantedDependencies => 1,
            Self::UnsupportedPlatform => 3,
            Self::NoDependencyData => 4,
        }
    }

    #[must_use]
    pub fn is_compliant(self) -> bool {
        self == Self::Compliant
    }
}

/// Collect the diagnostic lines of the report. A compliant report has none.
pub(crate) fn diagnostics(report: &Report<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    if report.allowed_patterns == 0 {
        lines.push(format!(
            "Unsupported platform: {}",
            report.platform.os_family()
        ));
    }
    if let Some(reason) = &report.no_data {
        lines.push(format!("No dependency data: {reason}"));
    }
    if !report.unwanted.is_empty() {
        lines.push(format!(
            "Unwanted dependencies found for {}:",
            report.platform
        ));
        lines.extend(report.unwanted.iter().map(|dependency| format!("\t{dependency}")));
    }
    lines
}

/// Validate the report.
///
/// Prints every diagnostic to stderr and returns the status that decides the exit code.
pub fn validate_report(report: &Report<'_>) -> CheckStatus {
    for line in diagnostics(report) {
        eprintln!("{line}");
    }
    report.status
}
