// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Finds the native binaries and shared objects in a build output directory. Uses the `goblin`
//! crate to recognize ELF, Mach-O and PE headers.

use goblin::Hint;
use rayon::prelude::*;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

use super::lister::{ListingError, ListingResult};

// XCOFF magic numbers (AIX), 32-bit and 64-bit. Not recognized by goblin.
const XCOFF_MAGIC_32: [u8; 2] = [0x01, 0xdf];
const XCOFF_MAGIC_64: [u8; 2] = [0x01, 0xf7];

// Native objects rarely carry an extension other than .so/.dylib/.dll/.exe, so this is safe.
static SKIPPED_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "txt", "md", "rst", "json", "yaml", "yml", "conf", "cfg", "ini", "toml", "xml", "html",
        "css", "js", "py", "pyc", "pyo", "sh", "bash", "pl", "rb", "php", "tcl", "gz", "bz2",
        "xz", "zst", "zip", "tar", "rpm", "deb", "png", "jpg", "gif", "svg", "ico", "pdf", "h",
        "c", "o", "a", "la", "pc", "class", "jar",
    ])
});

/// A binary artifact found in the artifact directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    file_name: OsString,
    // Lossy for display, the tool receives `file_name`.
    name: String,
    symlink: bool,
}

impl Artifact {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Argument passed to the introspection tool, relative to the artifact directory.
    ///
    /// The `./` marker lets the parser tell the artifact's own lines apart from its dependencies.
    #[must_use]
    pub fn tool_argument(&self) -> PathBuf {
        Path::new(".").join(&self.file_name)
    }
}

/// Find the artifacts directly inside `directory` (not recursive), sorted by file name.
///
/// Symbolic links to regular files are followed. When several entries lead to the same file, the
/// file is listed once, under its own name if it lives in the directory.
///
/// # Errors
/// Returns an error if the directory or one of its files cannot be read.
pub fn find_artifacts(directory: &Path) -> ListingResult<Vec<Artifact>> {
    let mut candidates = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ListingError::ArtifactDirectoryUnreadable {
            path: directory.to_path_buf(),
            source: e.into(),
        })?;
        let symlink = entry.path_is_symlink();
        // `is_file` follows the link, dangling links are not artifacts.
        let is_file = entry.file_type().is_file() || (symlink && entry.path().is_file());
        if !is_file || has_skipped_extension(entry.path()) {
            continue;
        }
        candidates.push(Artifact {
            path: entry.path().to_path_buf(),
            file_name: entry.file_name().to_os_string(),
            name: entry.file_name().to_string_lossy().into_owned(),
            symlink,
        });
    }

    let mut artifacts = candidates
        .into_par_iter()
        .map(|candidate| is_native_object(candidate.path()).map(|yes| yes.then_some(candidate)))
        .collect::<ListingResult<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    // Regular files first, so a link never shadows its target.
    artifacts.sort_by(|a, b| (a.symlink, &a.file_name).cmp(&(b.symlink, &b.file_name)));
    let mut targets = HashSet::new();
    artifacts.retain(|artifact| {
        targets.insert(fs::canonicalize(&artifact.path).unwrap_or_else(|_| artifact.path.clone()))
    });
    artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(artifacts)
}

fn has_skipped_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SKIPPED_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
}

/// Check the file header for a native object format.
fn is_native_object(path: &Path) -> ListingResult<bool> {
    let mut header = [0u8; 16];
    let mut file = fs::File::open(path).map_err(|e| ListingError::ArtifactDirectoryUnreadable {
        path: path.to_path_buf(),
        source: e,
    })?;
    match file.read_exact(&mut header) {
        Ok(()) => {}
        // Too small to be a native object.
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(false),
        Err(e) => {
            return Err(ListingError::ArtifactDirectoryUnreadable {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    if header[..2] == XCOFF_MAGIC_32 || header[..2] == XCOFF_MAGIC_64 {
        return Ok(true);
    }
    Ok(matches!(
        goblin::peek_bytes(&header),
        Ok(Hint::Elf(_) | Hint::Mach(_) | Hint::MachFat(_) | Hint::PE)
    ))
}
