//! Evidence capture over `adb shell`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::exec::{CommandRunner, ExecOptions, ExecResult, ProcessRunner};
use super::{
    ArtifactMap, Case, CollectError, DMESG_FILE, DUMPSYS_SUSPEND_FILE, SUSPEND_STATS_FILE,
};
use crate::config::AdbConfig;

/// Artifact file and the device shell command producing it, in step order.
pub const CAPTURE_PLAN: [(&str, &str); 3] = [
    (SUSPEND_STATS_FILE, "cat /d/suspend_stats"),
    (DUMPSYS_SUSPEND_FILE, "dumpsys suspend_control_internal"),
    (DMESG_FILE, "dmesg -T"),
];

/// Captures the three evidence files from a device.
#[derive(Clone)]
pub struct AdbCollector {
    adb: String,
    device: String,
    out_dir: PathBuf,
    opts: ExecOptions,
    runner: Arc<dyn CommandRunner>,
}

impl AdbCollector {
    /// Create a collector that runs the real `adb` binary.
    pub fn new(config: &AdbConfig, out_dir: PathBuf) -> Self {
        Self {
            adb: config.path.clone(),
            device: config.device.clone(),
            out_dir,
            opts: ExecOptions {
                timeout: Duration::from_secs(config.timeout_secs),
            },
            runner: Arc::new(ProcessRunner),
        }
    }

    /// Replace the command runner.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Build the adb argument list for one shell command.
    pub fn shell_args(&self, command: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        if !self.device.is_empty() {
            args.push("-s".to_owned());
            args.push(self.device.clone());
        }
        args.push("shell".to_owned());
        args.push(command.to_owned());
        args
    }

    /// Create a new timestamped case directory under the output directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or resolved.
    pub fn create_case_dir(&self) -> Result<PathBuf, CollectError> {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let dir = self.out_dir.join(format!("suspend_diag_{stamp}"));
        std::fs::create_dir_all(&dir).map_err(|source| CollectError::Io {
            path: dir.clone(),
            source,
        })?;
        std::path::absolute(&dir).map_err(|source| CollectError::Io { path: dir, source })
    }

    /// Capture all artifacts into a new timestamped case directory.
    ///
    /// # Errors
    ///
    /// See [`create_case_dir`](Self::create_case_dir) and
    /// [`collect_into`](Self::collect_into).
    pub async fn collect(&self) -> Result<Case, CollectError> {
        let dir = self.create_case_dir()?;
        self.collect_into(dir).await
    }

    /// Capture all artifacts into an existing case directory.
    ///
    /// A command that fails, times out or cannot be started still produces
    /// its file (with whatever stdout it printed, or empty) so the diagnosis
    /// can treat it as unavailable.
    ///
    /// # Errors
    ///
    /// Returns an error if an artifact file cannot be written.
    pub async fn collect_into(&self, dir: PathBuf) -> Result<Case, CollectError> {
        info!(case_dir = %dir.display(), device = %self.device_label(), "collecting evidence");

        let mut artifacts = ArtifactMap::default();
        for (name, command) in CAPTURE_PLAN {
            let path = self.capture(&dir, name, command).await?;
            artifacts.insert(name, path);
        }

        Ok(Case { dir, artifacts })
    }

    async fn capture(&self, dir: &Path, name: &str, command: &str) -> Result<PathBuf, CollectError> {
        let args = self.shell_args(command);
        let stdout = match self.runner.run(&self.adb, &args, &self.opts).await {
            Ok(result) => self.log_outcome(command, result),
            Err(err) => {
                warn!(command, error = %err, "adb command could not be run");
                String::new()
            }
        };

        let path = dir.join(name);
        std::fs::write(&path, stdout.as_bytes()).map_err(|source| CollectError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn log_outcome(&self, command: &str, result: ExecResult) -> String {
        if result.timed_out {
            warn!(command, timeout_secs = self.opts.timeout.as_secs(), "adb command timed out");
        } else if !result.success() {
            warn!(
                command,
                exit_code = ?result.exit_code,
                stderr = %result.stderr.trim(),
                "adb command failed"
            );
        } else {
            info!(
                command,
                bytes = result.stdout.len(),
                elapsed_ms = u64::try_from(result.duration.as_millis()).unwrap_or(u64::MAX),
                "captured"
            );
        }
        result.stdout
    }

    fn device_label(&self) -> &str {
        if self.device.is_empty() {
            "default"
        } else {
            &self.device
        }
    }
}
