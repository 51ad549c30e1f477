// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Resolves the allow-list of system libraries a build may link against.
//!
//! The policy is a table of rules. Every rule belongs to one OS family and may be refined by a
//! predicate on the distribution, its version, the architecture or the word size. All rules that
//! apply to the platform contribute their entries, in table order. New platforms are added as new
//! rules, the resolver itself does not change.

mod allow_list;
mod bsd;
mod darwin;
mod linux;
mod unix;
mod windows;

pub use allow_list::AllowList;

use crate::platform::{OsFamily, PlatformFacts};

/// One entry of the policy table.
pub(crate) struct PolicyRule {
    pub(crate) name: &'static str,
    pub(crate) family: OsFamily,
    pub(crate) applies: fn(&PlatformFacts) -> bool,
    pub(crate) entries: fn(&PlatformFacts) -> Vec<String>,
}

impl PolicyRule {
    fn matches(&self, facts: &PlatformFacts) -> bool {
        &self.family == facts.os_family() && (self.applies)(facts)
    }
}

static POLICY: &[&[PolicyRule]] = &[
    linux::RULES,
    unix::RULES,
    darwin::RULES,
    bsd::RULES,
    windows::RULES,
];

fn rules() -> impl Iterator<Item = &'static PolicyRule> {
    POLICY.iter().flat_map(|rules| rules.iter())
}

/// Resolve the allow-list for the platform.
///
/// The result is empty only for platforms without any policy, which means the platform is not
/// supported.
#[must_use]
pub fn resolve_allow_list(facts: &PlatformFacts) -> AllowList {
    rules()
        .filter(|rule| rule.matches(facts))
        .flat_map(|rule| (rule.entries)(facts))
        .collect()
}

/// Names of the rules that apply to the platform, in table order.
#[must_use]
pub fn applicable_rules(facts: &PlatformFacts) -> Vec<&'static str> {
    rules()
        .filter(|rule| rule.matches(facts))
        .map(|rule| rule.name)
        .collect()
}

fn always(_: &PlatformFacts) -> bool {
    true
}

fn owned(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|entry| (*entry).to_string()).collect()
}

/// Prefix every library name with a directory.
fn in_directory(directory: &str, libraries: &[&str]) -> Vec<String> {
    libraries
        .iter()
        .map(|library| format!("{directory}{library}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::WordSize;

    fn facts(os: &str, arch: &str) -> PlatformFacts {
        PlatformFacts::new(OsFamily::from_token(os), os, arch, None)
    }

    // One representative per family and distribution the policy knows about.
    const SUPPORTED: &[(&str, &str)] = &[
        ("lnx", "x64"),
        ("linux", "arm64"),
        ("rhel6", "x64"),
        ("rhel7", "x64"),
        ("rhel8", "arm64"),
        ("rhel9", "x64"),
        ("centos7", "x64"),
        ("amzn2", "x64"),
        ("amzn2023", "arm64"),
        ("sles12", "x64"),
        ("sles15", "x64"),
        ("ubuntu1604", "x64"),
        ("ubuntu1804", "x64"),
        ("ubuntu2204", "arm64"),
        ("debian9", "x64"),
        ("debian11", "x64"),
        ("debian12", "x64"),
        ("raspbian10", "armv7l"),
        ("alpine39", "x64"),
        ("alpine312", "arm64"),
        ("aix53", "ppc"),
        ("aix71", "ppc64"),
        ("solaris10", "sparc"),
        ("solaris10", "x86"),
        ("solaris11", "sparc64"),
        ("solaris11", "x64"),
        ("macos", "x64"),
        ("macos", "arm64"),
        ("fbsd11", "x64"),
        ("fbsd13", "arm64"),
        ("obsd66", "x64"),
        ("nbsd9", "x64"),
        ("hpux1131", "ia64"),
        ("hpux1131", "hppa"),
        ("hpux1123", "parisc"),
        ("win", "x86"),
        ("win", "x64"),
    ];

    #[test]
    fn test_every_supported_platform_has_a_policy() {
        for (os, arch) in SUPPORTED {
            let facts = facts(os, arch);
            assert!(
                !resolve_allow_list(&facts).is_empty(),
                "Expected a non-empty allow-list for {facts}"
            );
            assert!(!applicable_rules(&facts).is_empty());
        }
    }

    #[test]
    fn test_every_family_without_distribution_has_a_policy() {
        for family in [
            OsFamily::Linux,
            OsFamily::Aix,
            OsFamily::SunOs,
            OsFamily::Darwin,
            OsFamily::FreeBsd,
            OsFamily::OpenBsd,
            OsFamily::NetBsd,
            OsFamily::HpUx,
            OsFamily::Windows,
        ] {
            for word_size in [WordSize::Bits32, WordSize::Bits64] {
                let facts = PlatformFacts::new(family.clone(), "", "unknown", Some(word_size));
                assert!(
                    !resolve_allow_list(&facts).is_empty(),
                    "Expected a non-empty allow-list for {facts}"
                );
            }
        }
    }

    #[test]
    fn test_unknown_family_has_no_policy() {
        let facts = facts("plan9", "x64");
        assert!(resolve_allow_list(&facts).is_empty());
        assert!(applicable_rules(&facts).is_empty());
    }

    #[test]
    fn test_deterministic() {
        for (os, arch) in SUPPORTED {
            let facts = facts(os, arch);
            assert_eq!(resolve_allow_list(&facts), resolve_allow_list(&facts));
        }
    }

    #[test]
    fn test_rules_are_limited_to_their_family() {
        let linux = resolve_allow_list(&facts("rhel7", "x64"));
        let darwin = resolve_allow_list(&facts("macos", "x64"));
        assert!(linux.iter().all(|pattern| !pattern.contains(".dylib")));
        assert!(darwin.iter().all(|pattern| !pattern.contains(".so")));
    }
}
