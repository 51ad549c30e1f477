// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Policy for the commercial Unix systems: AIX, Solaris and HP-UX.
//!
//! Their tools report full paths, and AIX reports archive members (`/usr/lib/libc.a(shr_64.o)`),
//! so the 32-bit and 64-bit lists differ in directory or member name.

use super::{always, in_directory, PolicyRule};
use crate::platform::{OsFamily, PlatformFacts, WordSize};

pub(super) const RULES: &[PolicyRule] = &[
    PolicyRule {
        name: "aix",
        family: OsFamily::Aix,
        applies: always,
        entries: aix_entries,
    },
    PolicyRule {
        name: "aix-7",
        family: OsFamily::Aix,
        applies: |facts| facts.distribution().is_at_least(7, Some(1)),
        entries: |facts| {
            vec![match facts.word_size() {
                WordSize::Bits64 => "libdl.a(shr_64.o)".to_string(),
                WordSize::Bits32 => "libdl.a(shr.o)".to_string(),
            }]
        },
    },
    PolicyRule {
        name: "solaris",
        family: OsFamily::SunOs,
        applies: always,
        entries: |facts| {
            solaris_libraries(
                facts,
                &[
                    "libaio.so.1",
                    "libc.so.1",
                    "libcrypt.so.1",
                    "libdl.so.1",
                    "libm.so.2",
                    "libmd.so.1",
                    "libmp.so.2",
                    "libnsl.so.1",
                    "librt.so.1",
                    "libsendfile.so.1",
                    "libsocket.so.1",
                ],
            )
        },
    },
    PolicyRule {
        name: "solaris-sparc",
        family: OsFamily::SunOs,
        applies: |facts| facts.architecture().starts_with("sparc"),
        // Platform specific helpers loaded next to libc on SPARC.
        entries: |facts| solaris_libraries(facts, &["libc_psr.so.1", "libmd_psr.so.1"]),
    },
    PolicyRule {
        name: "solaris-11",
        family: OsFamily::SunOs,
        applies: |facts| solaris_release(facts).is_some_and(|release| release >= 11),
        entries: |facts| {
            solaris_libraries(facts, &["libcrypto.so.1.0.0", "libssl.so.1.0.0", "libz.so.1"])
        },
    },
    PolicyRule {
        name: "hpux-ia64",
        family: OsFamily::HpUx,
        applies: |facts| facts.architecture() == "ia64",
        entries: |facts| {
            let directory = match facts.word_size() {
                WordSize::Bits64 => "/usr/lib/hpux64/",
                WordSize::Bits32 => "/usr/lib/hpux32/",
            };
            in_directory(
                directory,
                &[
                    "libc.so.1",
                    "libdl.so.1",
                    "libm.so.1",
                    "libnsl.so.1",
                    "libpthread.so.1",
                    "libuca.so.1",
                    "libunwind.so.1",
                    "libxti.so.1",
                ],
            )
        },
    },
    PolicyRule {
        name: "hpux-parisc",
        family: OsFamily::HpUx,
        applies: |facts| facts.architecture() != "ia64",
        entries: |facts| {
            let directory = match facts.word_size() {
                WordSize::Bits64 => "/usr/lib/pa20_64/",
                WordSize::Bits32 => "/usr/lib/",
            };
            in_directory(
                directory,
                &["libc.2", "libdld.2", "libm.2", "libnsl.1", "libpthread.1"],
            )
        },
    },
];

fn aix_entries(facts: &PlatformFacts) -> Vec<String> {
    let members: &[&str] = match facts.word_size() {
        WordSize::Bits64 => &[
            "libc.a(shr_64.o)",
            "libcrypt.a(shr_64.o)",
            "libpthreads.a(shr_xpg5_64.o)",
        ],
        WordSize::Bits32 => &[
            "libc.a(shr.o)",
            "libcrypt.a(shr.o)",
            "libpthreads.a(shr_comm.o)",
            "libpthreads.a(shr_xpg5.o)",
        ],
    };
    let mut entries = vec!["/unix".to_string()];
    entries.extend(in_directory("/usr/lib/", members));
    entries
}

/// Solaris keeps 64-bit libraries in a `64` subdirectory of each library directory.
fn solaris_libraries(facts: &PlatformFacts, libraries: &[&str]) -> Vec<String> {
    let directories: &[&str] = match facts.word_size() {
        WordSize::Bits64 => &["/lib/64/", "/usr/lib/64/"],
        WordSize::Bits32 => &["/lib/", "/usr/lib/"],
    };
    directories
        .iter()
        .flat_map(|directory| in_directory(directory, libraries))
        .collect()
}

/// Solaris is known both as `solaris11` and by its SunOS release, `sunos5.11`.
fn solaris_release(facts: &PlatformFacts) -> Option<u32> {
    let distribution = facts.distribution();
    match distribution.name() {
        "sunos" | "sol" => distribution
            .version()
            .split('.')
            .nth(1)
            .and_then(|minor| minor.parse().ok())
            .or_else(|| distribution.major_version(None)),
        _ => distribution.major_version(None),
    }
}
