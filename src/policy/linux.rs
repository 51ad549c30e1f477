// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Linux policy. `ldd` reports the soname in the first field, so the patterns are sonames.

use super::{owned, PolicyRule};
use crate::platform::{OsFamily, PlatformFacts};

// Distributions built from the RHEL sources share the same base libraries.
const RHEL_LIKE: &[&str] = &["rhel", "centos", "rocky", "alma", "ol"];

// Ubuntu encodes the year and month without separator (`ubuntu1804`).
const UBUNTU_MAJOR_WIDTH: Option<usize> = Some(2);

pub(super) const RULES: &[PolicyRule] = &[
    PolicyRule {
        name: "linux-glibc",
        family: OsFamily::Linux,
        applies: is_glibc,
        entries: |_| {
            owned(&[
                "libc.so.6",
                "libcrypt.so.1",
                "libdl.so.2",
                "libm.so.6",
                "libpthread.so.0",
                "librt.so.1",
                "libutil.so.1",
                "libz.so.1",
            ])
        },
    },
    PolicyRule {
        name: "linux-glibc-arm64",
        family: OsFamily::Linux,
        applies: |facts| is_glibc(facts) && facts.architecture() == "arm64",
        // Compiler runtime, pulled in for the outlined atomics.
        entries: |_| owned(&["libgcc_s.so.1"]),
    },
    PolicyRule {
        name: "rhel",
        family: OsFamily::Linux,
        applies: |facts| is_rhel_like(facts) || is_distribution(facts, "amzn"),
        entries: |_| {
            owned(&[
                "libcom_err.so.2",
                "libcrypto.so",
                "libgssapi_krb5.so.2",
                "libk5crypto.so.3",
                "libkeyutils.so.1",
                "libkrb5.so.3",
                "libkrb5support.so.0",
                "libresolv.so.2",
                "libselinux.so.1",
                "libssl.so",
            ])
        },
    },
    PolicyRule {
        name: "rhel-7",
        family: OsFamily::Linux,
        applies: |facts| {
            (is_rhel_like(facts) && facts.distribution().is_at_least(7, None))
                || (is_distribution(facts, "amzn") && facts.distribution().is_below(2023, None))
        },
        entries: |_| owned(&["libfreebl3.so", "libpcre.so.1"]),
    },
    PolicyRule {
        name: "rhel-8",
        family: OsFamily::Linux,
        applies: |facts| {
            (is_rhel_like(facts) && facts.distribution().is_at_least(8, None))
                || (is_distribution(facts, "amzn") && facts.distribution().is_at_least(2023, None))
        },
        entries: |_| owned(&["libpcre2-8.so.0"]),
    },
    PolicyRule {
        name: "rhel-9",
        family: OsFamily::Linux,
        applies: |facts| {
            (is_rhel_like(facts) && facts.distribution().is_at_least(9, None))
                || (is_distribution(facts, "amzn") && facts.distribution().is_at_least(2023, None))
        },
        entries: |_| owned(&["libcrypt.so.2"]),
    },
    PolicyRule {
        name: "sles-12",
        family: OsFamily::Linux,
        applies: |facts| {
            is_distribution(facts, "sles") && facts.distribution().is_below(15, None)
        },
        entries: |_| owned(&["libcrypto.so.1.0.0", "libssl.so.1.0.0"]),
    },
    PolicyRule {
        name: "sles-15",
        family: OsFamily::Linux,
        applies: |facts| {
            is_distribution(facts, "sles") && facts.distribution().is_at_least(15, None)
        },
        entries: |_| owned(&["libcrypto.so.1.1", "libssl.so.1.1"]),
    },
    PolicyRule {
        name: "ubuntu-16",
        family: OsFamily::Linux,
        applies: |facts| {
            is_distribution(facts, "ubuntu")
                && facts.distribution().is_below(18, UBUNTU_MAJOR_WIDTH)
        },
        entries: |_| owned(&["libcrypto.so.1.0.0", "libssl.so.1.0.0"]),
    },
    PolicyRule {
        name: "ubuntu-18",
        family: OsFamily::Linux,
        applies: |facts| {
            is_distribution(facts, "ubuntu")
                && facts.distribution().is_at_least(18, UBUNTU_MAJOR_WIDTH)
                && facts.distribution().is_below(22, UBUNTU_MAJOR_WIDTH)
        },
        entries: |_| owned(&["libcrypto.so.1.1", "libssl.so.1.1"]),
    },
    PolicyRule {
        name: "ubuntu-22",
        family: OsFamily::Linux,
        applies: |facts| {
            is_distribution(facts, "ubuntu")
                && facts.distribution().is_at_least(22, UBUNTU_MAJOR_WIDTH)
        },
        entries: |_| owned(&["libcrypto.so.3", "libssl.so.3"]),
    },
    PolicyRule {
        name: "debian-9",
        family: OsFamily::Linux,
        applies: |facts| is_debian_like(facts) && facts.distribution().is_below(10, None),
        entries: |_| owned(&["libcrypto.so.1.0.2", "libssl.so.1.0.2"]),
    },
    PolicyRule {
        name: "debian-10",
        family: OsFamily::Linux,
        applies: |facts| {
            is_debian_like(facts)
                && facts.distribution().is_at_least(10, None)
                && facts.distribution().is_below(12, None)
        },
        entries: |_| owned(&["libcrypto.so.1.1", "libssl.so.1.1"]),
    },
    PolicyRule {
        name: "debian-12",
        family: OsFamily::Linux,
        applies: |facts| is_debian_like(facts) && facts.distribution().is_at_least(12, None),
        entries: |_| owned(&["libcrypto.so.3", "libssl.so.3"]),
    },
    PolicyRule {
        name: "linux-musl",
        family: OsFamily::Linux,
        applies: PlatformFacts::is_musl,
        entries: musl_entries,
    },
    PolicyRule {
        name: "linux-musl-arm64",
        family: OsFamily::Linux,
        applies: |facts| facts.is_musl() && facts.architecture() == "arm64",
        entries: |_| owned(&["libgcc_s.so.1"]),
    },
];

fn is_glibc(facts: &PlatformFacts) -> bool {
    !facts.is_musl()
}

fn is_distribution(facts: &PlatformFacts, name: &str) -> bool {
    facts.distribution().name() == name
}

fn is_rhel_like(facts: &PlatformFacts) -> bool {
    RHEL_LIKE.contains(&facts.distribution().name())
}

fn is_debian_like(facts: &PlatformFacts) -> bool {
    is_distribution(facts, "debian") || is_distribution(facts, "raspbian")
}

/// musl names its libc and loader after the architecture.
fn musl_entries(facts: &PlatformFacts) -> Vec<String> {
    let arch = match facts.architecture() {
        "arm64" => "aarch64",
        "x86" => "i386",
        "ppc64le" => "powerpc64le",
        arch if arch.starts_with("arm") => "armhf",
        arch => arch,
    };
    vec![
        format!("libc.musl-{arch}.so.1"),
        format!("/lib/ld-musl-{arch}.so.1"),
        "libcrypto.so".to_string(),
        "libssl.so".to_string(),
        "libz.so.1".to_string(),
    ]
}
