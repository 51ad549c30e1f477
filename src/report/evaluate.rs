// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Compares the extracted dependencies with the allow-list.

use crate::deps::DependencySet;
use crate::policy::AllowList;

/// Return the dependencies not covered by any allowed pattern, in first-seen order.
///
/// A dependency is covered when it contains a pattern as a substring. An empty allow-list covers
/// nothing, so callers must reject unsupported platforms before evaluating.
#[must_use]
pub fn evaluate(dependencies: &DependencySet, allow_list: &AllowList) -> Vec<String> {
    dependencies
        .iter()
        .filter(|dependency| allow_list.covering(dependency).is_none())
        .map(str::to_string)
        .collect()
}
