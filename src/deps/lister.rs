// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Runs the platform's dependency introspection tool (`ldd`, `otool -L`, ...) over the artifacts.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use wait_timeout::ChildExt;

use super::artifacts::Artifact;
use crate::platform::{OsFamily, PlatformFacts};

/// Default timeout for the introspection tool (60 seconds).
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// Result type for listing operations.
pub type ListingResult<T> = std::result::Result<T, ListingError>;

/// Errors that can occur while listing dependencies.
///
/// All variants mean no usable dependency data is available.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Failed to read artifact directory: {path:?}")]
    ArtifactDirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No binary artifacts found in: {path:?}")]
    NoArtifacts { path: PathBuf },
    #[error("Command not found: {command} (directory: {path:?})")]
    ToolNotFound { command: String, path: PathBuf },
    #[error("Command failed: {command} (directory: {path:?})")]
    ToolFailed {
        command: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Command exited with status {code:?}: {command} (directory: {path:?}): {stderr}")]
    ToolExitedWithError {
        command: String,
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Command timed out after {timeout:?}: {command} (directory: {path:?})")]
    ToolTimeout {
        command: String,
        path: PathBuf,
        timeout: Duration,
    },
}

impl ListingError {
    /// Whether the introspection tool itself could not deliver data.
    #[must_use]
    pub fn is_tool_unavailable(&self) -> bool {
        !matches!(
            self,
            Self::NoArtifacts { .. } | Self::ArtifactDirectoryUnreadable { .. }
        )
    }
}

/// The introspection command, without the artifact arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The native tool of the platform: `otool -L` on Darwin, `ldd` everywhere else.
    #[must_use]
    pub fn for_platform(facts: &PlatformFacts) -> Self {
        match facts.os_family() {
            OsFamily::Darwin => Self::new("otool", vec!["-L".to_string()]),
            _ => Self::new("ldd", Vec::new()),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Output of one run of the introspection tool.
///
/// A non-zero exit is kept rather than turned into an error: glibc `ldd` fails as soon as one of
/// several artifacts is static, yet still lists the dependencies of the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    command: String,
    path: PathBuf,
    success: bool,
    code: Option<i32>,
    lines: Vec<String>,
    stderr: String,
}

impl ToolOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Lines printed on stdout.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// The error describing an unsuccessful run.
    #[must_use]
    pub fn into_exit_error(self) -> ListingError {
        ListingError::ToolExitedWithError {
            command: self.command,
            path: self.path,
            code: self.code,
            stderr: self.stderr,
        }
    }
}

/// Run the introspection tool once over all artifacts and capture its output.
///
/// The tool runs inside `directory` and receives the artifacts as `./<name>`.
///
/// # Errors
/// Returns an error if there are no artifacts, if the tool cannot be started or does not finish
/// within `timeout`. In the latter case the process is killed.
pub fn list_dependencies(
    tool: &ToolCommand,
    directory: &Path,
    artifacts: &[Artifact],
    timeout: Duration,
) -> ListingResult<ToolOutput> {
    if artifacts.is_empty() {
        return Err(ListingError::NoArtifacts {
            path: directory.to_path_buf(),
        });
    }

    let mut child = Command::new(tool.program())
        .args(tool.args())
        .args(artifacts.iter().map(Artifact::tool_argument))
        .current_dir(directory)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ListingError::ToolNotFound {
                    command: tool.program().to_string(),
                    path: directory.to_path_buf(),
                }
            } else {
                ListingError::ToolFailed {
                    command: tool.program().to_string(),
                    path: directory.to_path_buf(),
                    source: e,
                }
            }
        })?;

    // Drain both pipes while waiting, a full pipe would otherwise block the tool.
    let stdout = spawn_reader(child.stdout.take());
    let stderr = spawn_reader(child.stderr.take());

    let status = wait_with_timeout(&mut child, timeout, tool.program(), directory)?;
    let stdout = join_reader(stdout, tool.program(), directory)?;
    let stderr = join_reader(stderr, tool.program(), directory)?;

    Ok(ToolOutput {
        command: tool.program().to_string(),
        path: directory.to_path_buf(),
        success: status.success(),
        code: status.code(),
        lines: stdout.lines().map(str::to_string).collect(),
        stderr: stderr.trim().to_string(),
    })
}

/// Wait for a child process to complete with a timeout. If the timeout is reached, the process
/// is killed.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    command: &str,
    directory: &Path,
) -> ListingResult<ExitStatus> {
    if let Some(status) = child
        .wait_timeout(timeout)
        .map_err(|e| ListingError::ToolFailed {
            command: command.to_string(),
            path: directory.to_path_buf(),
            source: e,
        })?
    {
        Ok(status)
    } else {
        let _ = child.kill();
        let _ = child.wait();
        Err(ListingError::ToolTimeout {
            command: command.to_string(),
            path: directory.to_path_buf(),
            timeout,
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut output = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut output)?;
        }
        Ok(String::from_utf8_lossy(&output).into_owned())
    })
}

fn join_reader(
    reader: JoinHandle<io::Result<String>>,
    command: &str,
    directory: &Path,
) -> ListingResult<String> {
    let to_error = |source| ListingError::ToolFailed {
        command: command.to_string(),
        path: directory.to_path_buf(),
        source,
    };
    reader
        .join()
        .map_err(|_| to_error(io::Error::other("Output reader thread panicked")))?
        .map_err(to_error)
}
