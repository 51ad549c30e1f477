// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! macOS policy. `otool -L` reports install names, which are absolute paths.

use super::{always, in_directory, owned, PolicyRule};
use crate::platform::OsFamily;

pub(super) const RULES: &[PolicyRule] = &[
    PolicyRule {
        name: "macos",
        family: OsFamily::Darwin,
        applies: always,
        entries: |_| {
            in_directory(
                "/usr/lib/",
                &[
                    "libSystem.B.dylib",
                    "libbz2.1.0.dylib",
                    "libffi.dylib",
                    "libncurses.5.4.dylib",
                    "libresolv.9.dylib",
                    "libz.1.dylib",
                ],
            )
        },
    },
    PolicyRule {
        name: "macos-frameworks",
        family: OsFamily::Darwin,
        applies: always,
        entries: |_| {
            owned(&[
                "/System/Library/Frameworks/CoreFoundation.framework/",
                "/System/Library/Frameworks/Security.framework/",
                "/System/Library/Frameworks/SystemConfiguration.framework/",
            ])
        },
    },
];
