// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Loads platform facts from the file written by the build, and applies explicit overrides.
//!
//! Two formats are accepted:
//! - the historical text format with two whitespace separated tokens, `<OS> <ARCH>`
//!   (e.g. `rhel7 x64`), where the OS token names both the family and the distribution;
//! - a JSON document (`.json` extension) with the fields `os`, `distribution`, `arch` and
//!   `word_size`.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{OsFamily, PlatformFacts, WordSize};

/// Result type for platform facts operations.
pub type FactsResult<T> = std::result::Result<T, FactsError>;

/// Errors that can occur while reading platform facts.
#[derive(Debug, Error)]
pub enum FactsError {
    #[error("Failed to read platform facts file: {path:?}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed platform facts file {path:?}: expected '<OS> <ARCH>', found {tokens} token(s)")]
    MalformedFile { path: PathBuf, tokens: usize },
    #[error("Failed to parse platform facts file: {path:?}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid word size: {value} (expected 32 or 64)")]
    InvalidWordSize { value: String },
}

#[derive(Debug, Deserialize)]
struct FactsDocument {
    os: String,
    #[serde(default)]
    distribution: Option<String>,
    arch: String,
    #[serde(default)]
    word_size: Option<u8>,
}

/// Explicit values that take precedence over the facts file and the host.
#[derive(Debug, Default, Clone)]
pub struct FactsOverrides {
    pub os: Option<String>,
    pub distribution: Option<String>,
    pub architecture: Option<String>,
    pub word_size: Option<WordSize>,
}

impl PlatformFacts {
    /// Read platform facts from a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not in one of the supported formats.
    pub fn from_file<P: AsRef<Path>>(path: P) -> FactsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FactsError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(path, &content)
        } else {
            Self::from_tokens(path, &content)
        }
    }

    fn from_tokens(path: &Path, content: &str) -> FactsResult<Self> {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        match tokens.as_slice() {
            [os, arch] => Ok(Self::new(OsFamily::from_token(os), os, arch, None)),
            _ => Err(FactsError::MalformedFile {
                path: path.to_path_buf(),
                tokens: tokens.len(),
            }),
        }
    }

    fn from_json(path: &Path, content: &str) -> FactsResult<Self> {
        let document: FactsDocument =
            serde_json::from_str(content).map_err(|e| FactsError::ParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        let word_size = document.word_size.map(WordSize::try_from).transpose()?;
        let distribution = document.distribution.as_deref().unwrap_or(&document.os);
        Ok(Self::new(
            OsFamily::from_token(&document.os),
            distribution,
            &document.arch,
            word_size,
        ))
    }

    /// Resolve the platform facts for this run.
    ///
    /// The facts file is used when given, otherwise the host is detected. Explicit overrides are
    /// applied on top. Overriding the OS also resets the distribution to the OS token, unless a
    /// distribution is given explicitly as well.
    ///
    /// # Errors
    /// Returns an error if the facts file cannot be read or parsed.
    pub fn resolve(facts_file: Option<&Path>, overrides: &FactsOverrides) -> FactsResult<Self> {
        let base = match facts_file {
            Some(path) => Self::from_file(path)?,
            None => Self::host(),
        };

        let os_family = overrides
            .os
            .as_deref()
            .map_or_else(|| base.os_family().clone(), OsFamily::from_token);
        let distribution = match (&overrides.distribution, &overrides.os) {
            (Some(distribution), _) => distribution.clone(),
            (None, Some(os)) => os.clone(),
            (None, None) => base.distribution().to_string(),
        };
        let architecture = overrides
            .architecture
            .clone()
            .unwrap_or_else(|| base.architecture().to_string());
        // An explicit architecture drives the word size unless that is given as well.
        let word_size = overrides.word_size.or_else(|| {
            overrides
                .architecture
                .is_none()
                .then_some(base.word_size())
        });

        Ok(Self::new(os_family, &distribution, &architecture, word_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn write_facts(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    fn write_json_facts(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_legacy_format() {
        let file = write_facts("rhel7 x64\n");
        let facts = PlatformFacts::from_file(file.path()).unwrap();
        assert_eq!(facts.os_family(), &OsFamily::Linux);
        assert_eq!(facts.distribution().to_string(), "rhel7");
        assert_eq!(facts.architecture(), "x86_64");
        assert_eq!(facts.word_size(), WordSize::Bits64);
    }

    #[test]
    fn test_legacy_format_other_families() {
        let file = write_facts("solaris10 sparc");
        let facts = PlatformFacts::from_file(file.path()).unwrap();
        assert_eq!(facts.os_family(), &OsFamily::SunOs);
        assert_eq!(facts.architecture(), "sparc");
        assert_eq!(facts.word_size(), WordSize::Bits32);

        let file = write_facts("obsd66 amd64");
        let facts = PlatformFacts::from_file(file.path()).unwrap();
        assert_eq!(facts.os_family(), &OsFamily::OpenBsd);
    }

    #[test]
    fn test_legacy_format_wrong_token_count() {
        let file = write_facts("rhel7");
        let result = PlatformFacts::from_file(file.path());
        assert!(matches!(
            result,
            Err(FactsError::MalformedFile { tokens: 1, .. })
        ));

        let file = write_facts("");
        assert!(PlatformFacts::from_file(file.path()).is_err());
    }

    #[test]
    fn test_json_format() {
        let file = write_json_facts(
            r#"{"os": "linux", "distribution": "ubuntu1804", "arch": "aarch64", "word_size": 64}"#,
        );
        let facts = PlatformFacts::from_file(file.path()).unwrap();
        assert_eq!(facts.os_family(), &OsFamily::Linux);
        assert_eq!(facts.distribution().name(), "ubuntu");
        assert_eq!(facts.architecture(), "arm64");
        assert_eq!(facts.word_size(), WordSize::Bits64);
    }

    #[test]
    fn test_json_format_distribution_defaults_to_os() {
        let file = write_json_facts(r#"{"os": "aix71", "arch": "ppc64"}"#);
        let facts = PlatformFacts::from_file(file.path()).unwrap();
        assert_eq!(facts.os_family(), &OsFamily::Aix);
        assert_eq!(facts.distribution().major_version(Some(1)), Some(7));
    }

    #[test]
    fn test_json_format_invalid_word_size() {
        let file = write_json_facts(r#"{"os": "linux", "arch": "x64", "word_size": 16}"#);
        assert!(matches!(
            PlatformFacts::from_file(file.path()),
            Err(FactsError::InvalidWordSize { .. })
        ));
    }

    #[test]
    fn test_json_format_malformed() {
        let file = write_json_facts("{not json");
        assert!(matches!(
            PlatformFacts::from_file(file.path()),
            Err(FactsError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_file_not_found() {
        let result = PlatformFacts::from_file("/nonexistent/facts");
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("Failed to read"));
    }

    #[test]
    fn test_resolve_overrides_architecture() {
        let file = write_facts("rhel8 x64");
        let overrides = FactsOverrides {
            architecture: Some("aarch64".to_string()),
            ..FactsOverrides::default()
        };
        let facts = PlatformFacts::resolve(Some(file.path()), &overrides).unwrap();
        assert_eq!(facts.distribution().to_string(), "rhel8");
        assert_eq!(facts.architecture(), "arm64");
        assert_eq!(facts.word_size(), WordSize::Bits64);
    }

    #[test]
    fn test_resolve_overrides_os_resets_distribution() {
        let file = write_facts("rhel8 x64");
        let overrides = FactsOverrides {
            os: Some("ubuntu2204".to_string()),
            ..FactsOverrides::default()
        };
        let facts = PlatformFacts::resolve(Some(file.path()), &overrides).unwrap();
        assert_eq!(facts.os_family(), &OsFamily::Linux);
        assert_eq!(facts.distribution().to_string(), "ubuntu2204");
    }

    #[test]
    fn test_resolve_explicit_everything() {
        let overrides = FactsOverrides {
            os: Some("linux".to_string()),
            distribution: Some("alpine39".to_string()),
            architecture: Some("x86".to_string()),
            word_size: Some(WordSize::Bits32),
        };
        let facts = PlatformFacts::resolve(None, &overrides).unwrap();
        assert!(facts.is_musl());
        assert_eq!(facts.architecture(), "x86");
        assert_eq!(facts.word_size(), WordSize::Bits32);
    }
}
