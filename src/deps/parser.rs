// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Extracts dependency identifiers from the raw output of the introspection tool.
//!
//! Each tool formats its output differently, so the field holding the dependency depends on the
//! platform:
//!
//! | Platform                         | Example line                                         | Field |
//! |----------------------------------|------------------------------------------------------|-------|
//! | Linux (glibc and musl)           | `libssl.so.1.1 => /usr/lib/libssl.so.1.1 (0x7f..)`   | 1st   |
//! | AIX (`ldd`)                      | `/usr/lib/libc.a(shr_64.o)`                          | 1st   |
//! | Darwin (`otool -L`)              | `/usr/lib/libSystem.B.dylib (compatibility ...)`     | 1st   |
//! | Windows (`ldd`)                  | `KERNEL32.DLL => /c/Windows/System32/KERNEL32.DLL`   | 1st   |
//! | FreeBSD, NetBSD, SunOS, HP-UX    | `libc.so.7 => /lib/libc.so.7 (0x800..)`              | 3rd   |
//! | OpenBSD (`ldd`, with a header)   | `00000.. 00000.. rlib 0 1 0 /usr/lib/libc.so.96.0`   | 7th   |
//!
//! Lines naming the examined artifact itself start with `./` (the tool was given relative paths)
//! and are dropped on every platform.

use super::DependencySet;
use crate::platform::{OsFamily, PlatformFacts};

// Marker of lines naming the artifact itself.
const ARTIFACT_MARKER: &str = "./";

// Messages the tools print instead of dependencies.
const NOISE: &[&str] = &[
    "not a dynamic executable",
    "statically linked",
    "Not a valid dynamic program",
];

// Entries injected by the glibc dynamic loader. They are not real library requirements and are
// matched against the file name of the token: the vDSO, loader and preload shims by prefix, the
// generic loader names exactly.
const GLIBC_PSEUDO_PREFIXES: &[&str] = &[
    "linux-vdso",
    "linux-gate",
    "ld-linux",
    "libarmmem",
    "libsigsegv-preload",
];
const GLIBC_PSEUDO_NAMES: &[&str] = &["ld.so.1", "ld64.so.1", "ld64.so.2"];

// Third field of a dependency the loader could not resolve: `=> not found`, `=> (file not found)`.
const UNRESOLVED_MARKER: &str = "not";

// First column of the header `ldd` prints on OpenBSD.
const OPENBSD_HEADER: &str = "Start";

/// Layout of the introspection tool output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// First field, without the loader pseudo-dependencies.
    Glibc,
    /// First field.
    FirstField,
    /// First field, lowercased.
    Windows,
    /// Third field, after the `=>` arrow.
    ThirdField,
    /// Seventh field, below a header line.
    OpenBsd,
}

impl LineFormat {
    #[must_use]
    pub fn for_platform(facts: &PlatformFacts) -> Self {
        match facts.os_family() {
            OsFamily::Linux if facts.is_musl() => Self::FirstField,
            OsFamily::Linux => Self::Glibc,
            OsFamily::Aix | OsFamily::Darwin | OsFamily::Other(_) => Self::FirstField,
            OsFamily::Windows => Self::Windows,
            OsFamily::FreeBsd | OsFamily::NetBsd | OsFamily::SunOs | OsFamily::HpUx => {
                Self::ThirdField
            }
            OsFamily::OpenBsd => Self::OpenBsd,
        }
    }

    fn dependency(self, line: &str) -> Option<String> {
        let mut fields = line.split_whitespace();
        let token = match self {
            Self::Glibc | Self::FirstField | Self::Windows => fields.next(),
            Self::ThirdField => {
                let first = fields.next();
                match fields.nth(1) {
                    // Unresolved, the path is missing, so report the library by its name.
                    Some(third) if third == UNRESOLVED_MARKER || third.starts_with('(') => first,
                    third => third,
                }
            }
            Self::OpenBsd => {
                if line.trim_start().starts_with(OPENBSD_HEADER) {
                    return None;
                }
                fields.nth(6)
            }
        }?;

        if token.starts_with(ARTIFACT_MARKER) {
            return None;
        }
        match self {
            Self::Glibc if is_glibc_pseudo_dependency(token) => None,
            Self::Windows => Some(token.to_ascii_lowercase()),
            _ => Some(token.to_string()),
        }
    }
}

fn is_glibc_pseudo_dependency(token: &str) -> bool {
    let name = token.rsplit('/').next().unwrap_or(token);
    GLIBC_PSEUDO_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
        || GLIBC_PSEUDO_NAMES.contains(&name)
}

fn is_noise(line: &str) -> bool {
    NOISE.iter().any(|noise| line.contains(noise))
}

/// Whether the text holds at least one line and nothing but tool noise.
///
/// glibc `ldd` prints `not a dynamic executable` on stderr and exits non-zero for static
/// binaries, while still listing the dynamic ones.
pub(super) fn is_noise_only(text: &str) -> bool {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty()).peekable();
    lines.peek().is_some() && lines.all(is_noise)
}

/// Extract the dependencies from the raw tool output.
///
/// An output without any dependency yields an empty set, which is not an error.
#[must_use]
pub fn extract<S: AsRef<str>>(lines: &[S], facts: &PlatformFacts) -> DependencySet {
    extract_with(lines, LineFormat::for_platform(facts))
}

fn extract_with<S: AsRef<str>>(lines: &[S], format: LineFormat) -> DependencySet {
    lines
        .iter()
        .map(|line| AsRef::<str>::as_ref(line))
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !trimmed.starts_with(ARTIFACT_MARKER)
                && !is_noise(trimmed)
        })
        .filter_map(|line| format.dependency(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(os: &str, arch: &str) -> PlatformFacts {
        PlatformFacts::new(OsFamily::from_token(os), os, arch, None)
    }

    fn extracted(lines: &[&str], os: &str, arch: &str) -> Vec<String> {
        extract(lines, &facts(os, arch))
            .iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(LineFormat::for_platform(&facts("rhel7", "x64")), LineFormat::Glibc);
        assert_eq!(
            LineFormat::for_platform(&facts("alpine312", "x64")),
            LineFormat::FirstField
        );
        assert_eq!(
            LineFormat::for_platform(&facts("fbsd12", "x64")),
            LineFormat::ThirdField
        );
        assert_eq!(
            LineFormat::for_platform(&facts("solaris11", "sparc64")),
            LineFormat::ThirdField
        );
        assert_eq!(LineFormat::for_platform(&facts("obsd66", "x64")), LineFormat::OpenBsd);
        assert_eq!(LineFormat::for_platform(&facts("win", "x86")), LineFormat::Windows);
    }

    #[test]
    fn test_glibc() {
        let lines = [
            "./python:",
            "\tlinux-vdso.so.1 (0x00007ffd3a9f2000)",
            "\tlibpthread.so.0 => /lib64/libpthread.so.0 (0x00007f1c1a2d1000)",
            "\tlibssl.so.10 => /lib64/libssl.so.10 (0x00007f1c1a05f000)",
            "\tlibc.so.6 => /lib64/libc.so.6 (0x00007f1c19c92000)",
            "\t/lib64/ld-linux-x86-64.so.2 (0x00007f1c1a4ed000)",
            "./_ssl.so:",
            "\tlibssl.so.10 => /lib64/libssl.so.10 (0x00007f1c1a05f000)",
        ];
        assert_eq!(
            extracted(&lines, "rhel7", "x64"),
            vec!["libpthread.so.0", "libssl.so.10", "libc.so.6"]
        );
    }

    #[test]
    fn test_glibc_arm_shims() {
        let lines = [
            "\tlinux-vdso.so.1 (0x7ef2e000)",
            "\t/usr/lib/arm-linux-gnueabihf/libarmmem-v7l.so (0x76f0a000)",
            "\tlibc.so.6 => /lib/arm-linux-gnueabihf/libc.so.6 (0x76db6000)",
            "\t/lib/ld-linux-armhf.so.3 (0x76f1f000)",
            "\t/lib/ld-linux-aarch64.so.1 (0x0000ffff8a8d2000)",
        ];
        assert_eq!(extracted(&lines, "raspbian10", "armv7l"), vec!["libc.so.6"]);
    }

    #[test]
    fn test_glibc_keeps_libraries_resembling_the_loader() {
        let lines = [
            "\tlibworld.so.1 => /opt/lib/libworld.so.1 (0x00007f1c1a2d1000)",
            "\tlibfield64.so.2 => /opt/lib/libfield64.so.2 (0x00007f1c1a05f000)",
            "\tlibbuild.so.1 => /opt/lib/libbuild.so.1 (0x00007f1c19e00000)",
            "\tmyld-linux-helper.so => /opt/lib/myld-linux-helper.so (0x00007f1c19d00000)",
            "\tlibc.so.6 => /lib64/libc.so.6 (0x00007f1c19c92000)",
            "\t/lib64/ld64.so.2 (0x00007f1c1a4ed000)",
            "\t/lib/ld.so.1 (0x00007f1c1a4ee000)",
            "\tlinux-vdso64.so.1 (0x00007ffd3a9f2000)",
        ];
        assert_eq!(
            extracted(&lines, "rhel8", "ppc64le"),
            vec![
                "libworld.so.1",
                "libfield64.so.2",
                "libbuild.so.1",
                "myld-linux-helper.so",
                "libc.so.6"
            ]
        );
    }

    #[test]
    fn test_glibc_missing_dependency_is_reported() {
        let lines = ["\tlibfoo.so.2 => not found"];
        assert_eq!(extracted(&lines, "ubuntu1804", "x64"), vec!["libfoo.so.2"]);
    }

    #[test]
    fn test_musl_keeps_loader() {
        let lines = [
            "\t/lib/ld-musl-x86_64.so.1 (0x7f0e6a8b4000)",
            "\tlibz.so.1 => /lib/libz.so.1 (0x7f0e6a87f000)",
            "\tlibc.musl-x86_64.so.1 => /lib/ld-musl-x86_64.so.1 (0x7f0e6a8b4000)",
        ];
        assert_eq!(
            extracted(&lines, "alpine312", "x64"),
            vec![
                "/lib/ld-musl-x86_64.so.1",
                "libz.so.1",
                "libc.musl-x86_64.so.1"
            ]
        );
    }

    #[test]
    fn test_aix() {
        let lines = [
            "./python needs:",
            "         /usr/lib/libc.a(shr_64.o)",
            "         /usr/lib/libpthreads.a(shr_xpg5_64.o)",
            "         /unix",
        ];
        assert_eq!(
            extracted(&lines, "aix71", "ppc64"),
            vec![
                "/usr/lib/libc.a(shr_64.o)",
                "/usr/lib/libpthreads.a(shr_xpg5_64.o)",
                "/unix"
            ]
        );
    }

    #[test]
    fn test_darwin() {
        let lines = [
            "./python:",
            "\t/usr/lib/libSystem.B.dylib (compatibility version 1.0.0, current version 1252.250.1)",
            "\t/System/Library/Frameworks/CoreFoundation.framework/Versions/A/CoreFoundation (compatibility version 150.0.0, current version 1575.17.0)",
        ];
        assert_eq!(
            extracted(&lines, "macos", "x64"),
            vec![
                "/usr/lib/libSystem.B.dylib",
                "/System/Library/Frameworks/CoreFoundation.framework/Versions/A/CoreFoundation"
            ]
        );
    }

    #[test]
    fn test_freebsd() {
        let lines = [
            "./python:",
            "\tlibcrypt.so.5 => /lib/libcrypt.so.5 (0x800a2e000)",
            "\tlibc.so.7 => /lib/libc.so.7 (0x800c4e000)",
        ];
        assert_eq!(
            extracted(&lines, "fbsd12", "x64"),
            vec!["/lib/libcrypt.so.5", "/lib/libc.so.7"]
        );
    }

    #[test]
    fn test_freebsd_unresolved_dependencies_keep_their_name() {
        let lines = [
            "./python:",
            "\tlibffi.so.6 => not found (0)",
            "\tlibintl.so.8 => not found (0)",
            "\tlibc.so.7 => /lib/libc.so.7 (0x800c4e000)",
        ];
        assert_eq!(
            extracted(&lines, "fbsd12", "x64"),
            vec!["libffi.so.6", "libintl.so.8", "/lib/libc.so.7"]
        );
    }

    #[test]
    fn test_solaris_unresolved_dependencies_keep_their_name() {
        let lines = [
            "./python:",
            "\tlibffi.so.6 =>\t (file not found)",
            "\tlibsqlite3.so.0 =>\t (file not found)",
            "\tlibc.so.1 =>\t /lib/libc.so.1",
        ];
        assert_eq!(
            extracted(&lines, "solaris10", "sparc"),
            vec!["libffi.so.6", "libsqlite3.so.0", "/lib/libc.so.1"]
        );
    }

    #[test]
    fn test_solaris() {
        let lines = [
            "./python:",
            "\tlibsocket.so.1 =>\t /lib/64/libsocket.so.1",
            "\tlibc.so.1 =>\t /lib/64/libc.so.1",
            "\t/platform/sun4v/lib/sparcv9/libc_psr.so.1",
        ];
        // The platform shim line has no third field and is skipped.
        assert_eq!(
            extracted(&lines, "solaris11", "sparc64"),
            vec!["/lib/64/libsocket.so.1", "/lib/64/libc.so.1"]
        );
    }

    #[test]
    fn test_openbsd() {
        let lines = [
            "./python:",
            "\tStart            End              Type  Open Ref GrpRef Name",
            "\t00000d6c5800000 00000d6c5a1d000 exe   1    0   0      ./python",
            "\t00000d8cc2d4000 00000d8cc5cc000 rlib  0    1   0      /usr/lib/libc.so.96.0",
            "\t00000d8c7b20000 00000d8c7b20000 ld.so 0    1   0      /usr/libexec/ld.so",
        ];
        assert_eq!(
            extracted(&lines, "obsd66", "x64"),
            vec!["/usr/lib/libc.so.96.0", "/usr/libexec/ld.so"]
        );
    }

    #[test]
    fn test_windows_lowercases() {
        let lines = [
            "\tntdll.dll => /c/WINDOWS/SYSTEM32/ntdll.dll (0x7ffd5e6a0000)",
            "\tKERNEL32.DLL => /c/WINDOWS/System32/KERNEL32.DLL (0x7ffd5d490000)",
        ];
        assert_eq!(
            extracted(&lines, "win", "x64"),
            vec!["ntdll.dll", "kernel32.dll"]
        );
    }

    #[test]
    fn test_noise_lines() {
        let lines = [
            "./static_tool:",
            "\tnot a dynamic executable",
            "\tstatically linked",
            "",
            "   ",
        ];
        assert!(extract(&lines, &facts("rhel8", "x64")).is_empty());
    }

    #[test]
    fn test_noise_only() {
        assert!(is_noise_only("\tnot a dynamic executable\n"));
        assert!(is_noise_only("./a: not a dynamic executable\n\n./b: statically linked\n"));
        assert!(!is_noise_only(""));
        assert!(!is_noise_only("ldd: ./python: No such file or directory\n"));
        assert!(!is_noise_only("\tnot a dynamic executable\nSegmentation fault\n"));
    }

    #[test]
    fn test_idempotent_and_deduplicated() {
        let lines = [
            "\tlibc.so.6 => /lib/libc.so.6 (0x1)",
            "\tlibm.so.6 => /lib/libm.so.6 (0x2)",
            "\tlibc.so.6 => /lib/libc.so.6 (0x1)",
        ];
        let facts = facts("ubuntu2004", "x64");
        let first = extract(&lines, &facts);
        let second = extract(&lines, &facts);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let lines: [&str; 0] = [];
        assert!(extract(&lines, &facts("rhel7", "x64")).is_empty());
    }
}
