// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Describes the platform a build targets. The facts are captured once at start-up and passed
//! down to every pipeline stage instead of being re-read from the environment.

mod distribution;
mod facts_file;

pub use distribution::Distribution;
pub use facts_file::{FactsError, FactsOverrides, FactsResult};

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Operating system family of the build target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Linux,
    Aix,
    SunOs,
    Darwin,
    FreeBsd,
    OpenBsd,
    NetBsd,
    HpUx,
    Windows,
    Other(String), // Unrecognized name, kept for the unsupported-platform diagnostic.
}

impl OsFamily {
    /// Map an OS name or historical OS token (`rhel7`, `fbsd12`, `sol10`, ...) to a family.
    ///
    /// Only the alphabetic prefix of the token is considered, so version suffixes are ignored.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let lower = token.trim().to_ascii_lowercase();
        let name: String = lower
            .chars()
            .take_while(|c| c.is_ascii_alphabetic() || *c == '-')
            .collect();
        match name.trim_end_matches('-') {
            "linux" | "lnx" | "rhel" | "centos" | "amzn" | "sles" | "ubuntu" | "debian"
            | "alpine" | "raspbian" => Self::Linux,
            "aix" => Self::Aix,
            "sunos" | "solaris" | "sol" => Self::SunOs,
            "darwin" | "macos" | "osx" => Self::Darwin,
            "freebsd" | "fbsd" => Self::FreeBsd,
            "openbsd" | "obsd" => Self::OpenBsd,
            "netbsd" | "nbsd" => Self::NetBsd,
            "hp-ux" | "hpux" => Self::HpUx,
            "windows" | "win" | "nt" => Self::Windows,
            _ => Self::Other(token.trim().to_string()),
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "linux",
            Self::Aix => "aix",
            Self::SunOs => "sunos",
            Self::Darwin => "darwin",
            Self::FreeBsd => "freebsd",
            Self::OpenBsd => "openbsd",
            Self::NetBsd => "netbsd",
            Self::HpUx => "hp-ux",
            Self::Windows => "windows",
            Self::Other(name) => name,
        };
        f.write_str(name)
    }
}

impl Serialize for OsFamily {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Pointer width of the build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordSize {
    Bits32,
    Bits64,
}

// Architectures with 64-bit pointers. Anything else is treated as 32-bit.
const ARCHITECTURES_64: &[&str] = &[
    "x86_64", "arm64", "ppc64", "ppc64le", "sparc64", "s390x", "ia64", "mips64", "riscv64",
];

impl WordSize {
    /// Derive the word size from a normalized architecture name.
    #[must_use]
    pub fn from_architecture(architecture: &str) -> Self {
        if ARCHITECTURES_64.contains(&architecture) {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }

    #[must_use]
    pub fn bits(self) -> u8 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }
}

impl Serialize for WordSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl TryFrom<u8> for WordSize {
    type Error = FactsError;

    fn try_from(bits: u8) -> FactsResult<Self> {
        match bits {
            32 => Ok(Self::Bits32),
            64 => Ok(Self::Bits64),
            other => Err(FactsError::InvalidWordSize {
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for WordSize {
    type Err = FactsError;

    fn from_str(value: &str) -> FactsResult<Self> {
        match value.trim() {
            "32" => Ok(Self::Bits32),
            "64" => Ok(Self::Bits64),
            other => Err(FactsError::InvalidWordSize {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for WordSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Normalize the architecture aliases used by build scripts and `uname`.
#[must_use]
pub fn normalize_architecture(architecture: &str) -> String {
    let lower = architecture.trim().to_ascii_lowercase();
    match lower.as_str() {
        "x64" | "amd64" | "x86_64" => "x86_64".to_string(),
        "x86" | "i386" | "i486" | "i586" | "i686" => "x86".to_string(),
        "arm64" | "aarch64" => "arm64".to_string(),
        "sparcv9" | "sparc64" => "sparc64".to_string(),
        "powerpc64" | "ppc64" => "ppc64".to_string(),
        "powerpc64le" | "ppc64le" => "ppc64le".to_string(),
        "powerpc" | "ppc" => "ppc".to_string(),
        "ia64" | "itanium" => "ia64".to_string(),
        "hppa" | "parisc" | "pa-risc" | "hppa2.0w" => "hppa".to_string(),
        _ => lower,
    }
}

/// Immutable snapshot of the build target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformFacts {
    os_family: OsFamily,
    distribution: Distribution,
    architecture: String,
    word_size: WordSize,
}

impl PlatformFacts {
    /// Create platform facts. The architecture is normalized and, when no word size is given,
    /// the word size is derived from it.
    #[must_use]
    pub fn new(
        os_family: OsFamily,
        distribution: &str,
        architecture: &str,
        word_size: Option<WordSize>,
    ) -> Self {
        let architecture = normalize_architecture(architecture);
        let word_size = word_size.unwrap_or_else(|| WordSize::from_architecture(&architecture));
        Self {
            os_family,
            distribution: Distribution::parse(distribution),
            architecture,
            word_size,
        }
    }

    /// Facts for the host running the checker.
    #[must_use]
    pub fn host() -> Self {
        Self::new(
            OsFamily::from_token(std::env::consts::OS),
            "",
            std::env::consts::ARCH,
            None,
        )
    }

    #[must_use]
    pub fn os_family(&self) -> &OsFamily {
        &self.os_family
    }

    #[must_use]
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    #[must_use]
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    #[must_use]
    pub fn word_size(&self) -> WordSize {
        self.word_size
    }

    /// Whether the target links against musl instead of glibc.
    #[must_use]
    pub fn is_musl(&self) -> bool {
        self.os_family == OsFamily::Linux && self.distribution.name() == "alpine"
    }
}

impl fmt::Display for PlatformFacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.os_family)?;
        if !self.distribution.is_empty() {
            write!(f, " ({})", self.distribution)?;
        }
        write!(f, " {} {}-bit", self.architecture, self.word_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_family_from_historical_tokens() {
        assert_eq!(OsFamily::from_token("rhel7"), OsFamily::Linux);
        assert_eq!(OsFamily::from_token("ubuntu1804"), OsFamily::Linux);
        assert_eq!(OsFamily::from_token("alpine312"), OsFamily::Linux);
        assert_eq!(OsFamily::from_token("aix71"), OsFamily::Aix);
        assert_eq!(OsFamily::from_token("solaris11"), OsFamily::SunOs);
        assert_eq!(OsFamily::from_token("macos"), OsFamily::Darwin);
        assert_eq!(OsFamily::from_token("fbsd12"), OsFamily::FreeBsd);
        assert_eq!(OsFamily::from_token("obsd66"), OsFamily::OpenBsd);
        assert_eq!(OsFamily::from_token("nbsd9"), OsFamily::NetBsd);
        assert_eq!(OsFamily::from_token("hpux1131"), OsFamily::HpUx);
        assert_eq!(OsFamily::from_token("HP-UX"), OsFamily::HpUx);
        assert_eq!(OsFamily::from_token("win"), OsFamily::Windows);
        assert_eq!(OsFamily::from_token("rhel-8"), OsFamily::Linux);
    }

    #[test]
    fn test_os_family_unknown_keeps_name() {
        let family = OsFamily::from_token("plan9");
        assert_eq!(family, OsFamily::Other("plan9".to_string()));
        assert!(!family.is_supported());
        assert_eq!(family.to_string(), "plan9");
    }

    #[test]
    fn test_host_os_names() {
        // Values of std::env::consts::OS.
        assert_eq!(OsFamily::from_token("linux"), OsFamily::Linux);
        assert_eq!(OsFamily::from_token("macos"), OsFamily::Darwin);
        assert_eq!(OsFamily::from_token("freebsd"), OsFamily::FreeBsd);
        assert_eq!(OsFamily::from_token("solaris"), OsFamily::SunOs);
        assert_eq!(OsFamily::from_token("windows"), OsFamily::Windows);
    }

    #[test]
    fn test_architecture_normalization() {
        assert_eq!(normalize_architecture("x64"), "x86_64");
        assert_eq!(normalize_architecture("AMD64"), "x86_64");
        assert_eq!(normalize_architecture("aarch64"), "arm64");
        assert_eq!(normalize_architecture("i686"), "x86");
        assert_eq!(normalize_architecture("sparcv9"), "sparc64");
        assert_eq!(normalize_architecture("sparc"), "sparc");
    }

    #[test]
    fn test_word_size_derived_from_architecture() {
        let facts = PlatformFacts::new(OsFamily::Linux, "rhel7", "x64", None);
        assert_eq!(facts.architecture(), "x86_64");
        assert_eq!(facts.word_size(), WordSize::Bits64);

        let facts = PlatformFacts::new(OsFamily::SunOs, "solaris10", "sparc", None);
        assert_eq!(facts.word_size(), WordSize::Bits32);

        let facts = PlatformFacts::new(OsFamily::Aix, "aix71", "ppc64", Some(WordSize::Bits32));
        assert_eq!(facts.word_size(), WordSize::Bits32);
    }

    #[test]
    fn test_word_size_from_str() {
        assert_eq!("64".parse::<WordSize>().unwrap(), WordSize::Bits64);
        assert_eq!(" 32 ".parse::<WordSize>().unwrap(), WordSize::Bits32);
        assert!("16".parse::<WordSize>().is_err());
    }

    #[test]
    fn test_musl_detection() {
        assert!(PlatformFacts::new(OsFamily::Linux, "alpine39", "x64", None).is_musl());
        assert!(!PlatformFacts::new(OsFamily::Linux, "ubuntu2004", "x64", None).is_musl());
    }

    #[test]
    fn test_display() {
        let facts = PlatformFacts::new(OsFamily::Linux, "rhel7", "x64", None);
        assert_eq!(facts.to_string(), "linux (rhel7) x86_64 64-bit");
        let facts = PlatformFacts::new(OsFamily::Darwin, "", "arm64", None);
        assert_eq!(facts.to_string(), "darwin arm64 64-bit");
    }
}
