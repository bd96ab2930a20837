//! Evidence acquisition: capture artifacts from a device or load a saved case.
//!
//! A case directory holds up to three artifact files. The decision engine
//! never reads them directly; [`read_evidence`] turns them into an
//! [`Evidence`] value first.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analyzer::Evidence;

pub mod adb;
pub mod exec;

pub use adb::AdbCollector;
pub use exec::{CommandRunner, ExecOptions, ExecResult, ProcessRunner};

/// File name of the `/d/suspend_stats` capture.
pub const SUSPEND_STATS_FILE: &str = "suspend_stats.txt";
/// File name of the `dumpsys suspend_control_internal` capture.
pub const DUMPSYS_SUSPEND_FILE: &str = "dumpsys_suspend.txt";
/// File name of the `dmesg` capture.
pub const DMESG_FILE: &str = "dmesg.txt";

/// Artifact file names in diagnosis step order.
pub const ARTIFACT_FILES: [&str; 3] = [SUSPEND_STATS_FILE, DUMPSYS_SUSPEND_FILE, DMESG_FILE];

/// Errors produced while collecting or loading evidence.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    /// Filesystem failure.
    #[error("i/o error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The host program could not be started or awaited.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that failed.
        program: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The case directory does not exist.
    #[error("case directory not found: {0}")]
    MissingCase(PathBuf),
}

/// One captured artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// File name, one of [`ARTIFACT_FILES`].
    pub name: String,
    /// Absolute path of the file.
    pub path: PathBuf,
}

/// Ordered file name to path mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactMap {
    entries: Vec<Artifact>,
}

impl ArtifactMap {
    /// Append an artifact, replacing an existing entry with the same name.
    pub fn insert(&mut self, name: &str, path: PathBuf) {
        if let Some(existing) = self.entries.iter_mut().find(|a| a.name == name) {
            existing.path = path;
            return;
        }
        self.entries.push(Artifact {
            name: name.to_owned(),
            path,
        });
    }

    /// Path for an artifact name.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.path.as_path())
    }

    /// Artifacts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.entries.iter()
    }

    /// Number of artifacts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no artifact is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A case directory and the artifacts found in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Case {
    /// Case directory.
    pub dir: PathBuf,
    /// Artifacts inside `dir`.
    pub artifacts: ArtifactMap,
}

/// Load a previously captured case directory.
///
/// Only artifact files that exist are listed; missing ones are left out and
/// later read as empty evidence.
///
/// # Errors
///
/// Returns an error if `dir` does not exist or cannot be resolved.
pub fn load_existing(dir: &Path) -> Result<Case, CollectError> {
    if !dir.is_dir() {
        return Err(CollectError::MissingCase(dir.to_path_buf()));
    }
    let dir = dir.canonicalize().map_err(|source| CollectError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut artifacts = ArtifactMap::default();
    for name in ARTIFACT_FILES {
        let path = dir.join(name);
        if path.is_file() {
            artifacts.insert(name, path);
        }
    }

    Ok(Case { dir, artifacts })
}

/// Read artifact files into [`Evidence`].
///
/// Missing entries and unreadable files become empty strings. Invalid UTF-8
/// is replaced rather than rejected.
pub fn read_evidence(artifacts: &ArtifactMap) -> Evidence {
    Evidence {
        stats: read_artifact(artifacts, SUSPEND_STATS_FILE),
        wakelocks: read_artifact(artifacts, DUMPSYS_SUSPEND_FILE),
        dmesg: read_artifact(artifacts, DMESG_FILE),
    }
}

/// Read one artifact as lossy UTF-8, empty when absent or unreadable.
pub fn read_artifact(artifacts: &ArtifactMap, name: &str) -> String {
    let Some(path) = artifacts.get(name) else {
        return String::new();
    };
    match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read artifact");
            String::new()
        }
    }
}
