// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Splits loose distribution identifiers (`rhel7`, `ubuntu1804`, `rhel-8.4`) into name and version.

use serde::{Serialize, Serializer};
use std::fmt;

/// Distribution identifier as written by the build, e.g. `rhel7` or `alpine312`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Distribution {
    raw: String,
    name: String,
    version: String,
}

impl Distribution {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_ascii_lowercase();
        let split = raw
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(raw.len());
        let (name, version) = raw.split_at(split);
        Self {
            name: name.trim_end_matches(['-', '_', '.']).to_string(),
            version: version.to_string(),
            raw,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Read the major version from the leading digits of the version.
    ///
    /// Some distributions encode the version without separators (`ubuntu1804`, `alpine312`), in
    /// which case `width` limits how many leading digits form the major version.
    #[must_use]
    pub fn major_version(&self, width: Option<usize>) -> Option<u32> {
        let digits: String = self
            .version
            .chars()
            .take_while(char::is_ascii_digit)
            .take(width.unwrap_or(usize::MAX))
            .collect();
        digits.parse().ok()
    }

    /// Whether the major version is known and at least `minimum`.
    #[must_use]
    pub fn is_at_least(&self, minimum: u32, width: Option<usize>) -> bool {
        self.major_version(width)
            .is_some_and(|major| major >= minimum)
    }

    /// Whether the major version is known and below `maximum`.
    #[must_use]
    pub fn is_below(&self, maximum: u32, width: Option<usize>) -> bool {
        self.major_version(width)
            .is_some_and(|major| major < maximum)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Distribution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}
