// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! FreeBSD, OpenBSD and NetBSD policy.
//!
//! The BSD loaders report resolved paths and the library versions move with every release, so
//! these patterns stop at the unversioned soname.

use super::{always, in_directory, owned, PolicyRule};
use crate::platform::OsFamily;

pub(super) const RULES: &[PolicyRule] = &[
    PolicyRule {
        name: "freebsd",
        family: OsFamily::FreeBsd,
        applies: always,
        entries: |_| {
            let mut entries = in_directory(
                "/lib/",
                &[
                    "libc.so.",
                    "libcrypt.so.",
                    "libcrypto.so.",
                    "libm.so.",
                    "libthr.so.",
                    "libutil.so.",
                    "libz.so.",
                ],
            );
            entries.extend(in_directory("/usr/lib/", &["libssl.so."]));
            entries
        },
    },
    PolicyRule {
        name: "freebsd-12",
        family: OsFamily::FreeBsd,
        applies: |facts| facts.distribution().is_at_least(12, None),
        entries: |_| owned(&["/lib/libgcc_s.so.1"]),
    },
    PolicyRule {
        name: "openbsd",
        family: OsFamily::OpenBsd,
        applies: always,
        entries: |_| {
            let mut entries = in_directory(
                "/usr/lib/",
                &[
                    "libc.so.",
                    "libcrypto.so.",
                    "libm.so.",
                    "libpthread.so.",
                    "libssl.so.",
                    "libutil.so.",
                    "libz.so.",
                ],
            );
            entries.push("/usr/libexec/ld.so".to_string());
            entries
        },
    },
    PolicyRule {
        name: "netbsd",
        family: OsFamily::NetBsd,
        applies: always,
        entries: |_| {
            in_directory(
                "/usr/lib/",
                &[
                    "libc.so.",
                    "libcrypt.so.",
                    "libcrypto.so.",
                    "libm.so.",
                    "libpthread.so.",
                    "libssl.so.",
                    "libutil.so.",
                    "libz.so.",
                ],
            )
        },
    },
];
