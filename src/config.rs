//! Configuration loading and validation.
//!
//! Loads `config.toml` from `~/.suspend-doctor/` (or an explicit path). Every
//! section uses `#[serde(default)]` so a missing or empty file is valid.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Device access over adb.
    #[serde(default)]
    pub adb: AdbConfig,

    /// Where case directories are created.
    #[serde(default)]
    pub output: OutputConfig,

    /// LLM narrative generation.
    #[serde(default)]
    pub narrative: NarrativeConfig,

    /// Report rendering.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Device access settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AdbConfig {
    /// Path to the adb executable.
    #[serde(default = "default_adb_path")]
    pub path: String,

    /// Target device serial. Empty selects adb's default device.
    #[serde(default)]
    pub device: String,

    /// Per-command timeout in seconds.
    #[serde(default = "default_adb_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            path: default_adb_path(),
            device: String::new(),
            timeout_secs: default_adb_timeout_secs(),
        }
    }
}

/// Output location.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Parent directory for timestamped case directories.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// LLM narrative settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeConfig {
    /// Master switch for the narrative section.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Model spec in `<provider>/<model>` form (e.g. "ollama/qwen3:8b").
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL override. Empty uses the provider default.
    #[serde(default)]
    pub endpoint: String,

    /// Environment variable holding the API key for hosted providers.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Maximum characters of each log sent to the model.
    #[serde(default = "default_max_log_chars")]
    pub max_log_chars: usize,

    /// Maximum tokens in the model response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_model(),
            endpoint: String::new(),
            api_key_env: default_api_key_env(),
            max_log_chars: default_max_log_chars(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Maximum raw log lines quoted per step excerpt.
    #[serde(default = "default_excerpt_lines")]
    pub excerpt_lines: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            excerpt_lines: default_excerpt_lines(),
        }
    }
}

impl Config {
    /// Validate that configuration values are within sane bounds.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.adb.path.trim().is_empty(), "adb.path must not be empty");
        anyhow::ensure!(
            (1..=600).contains(&self.adb.timeout_secs),
            "adb.timeout_secs must be in [1, 600]"
        );
        anyhow::ensure!(
            (1..=100_000).contains(&self.narrative.max_log_chars),
            "narrative.max_log_chars must be in [1, 100000]"
        );
        anyhow::ensure!(
            self.narrative.max_tokens > 0,
            "narrative.max_tokens must be positive"
        );
        anyhow::ensure!(
            self.narrative
                .model
                .split_once('/')
                .is_some_and(|(provider, model)| !provider.is_empty() && !model.is_empty()),
            "narrative.model must be '<provider>/<model>'"
        );
        anyhow::ensure!(
            (1..=500).contains(&self.report.excerpt_lines),
            "report.excerpt_lines must be in [1, 500]"
        );
        Ok(())
    }
}

// Default value functions for serde.

fn default_adb_path() -> String {
    "adb".to_owned()
}
fn default_adb_timeout_secs() -> u64 {
    60
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./reports")
}
fn default_true() -> bool {
    true
}
fn default_model() -> String {
    "ollama/qwen3:8b".to_owned()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_owned()
}
fn default_max_log_chars() -> usize {
    4000
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_excerpt_lines() -> usize {
    20
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Load an explicit config file, or the default one if it exists.
///
/// An explicit path must exist. Without one, a missing default file yields
/// [`Config::default`].
///
/// # Errors
///
/// Returns an error if a file is present but invalid.
pub fn load_or_default(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let path = config_dir()?.join("config.toml");
    if path.is_file() {
        load_config(&path)
    } else {
        Ok(Config::default())
    }
}

/// Resolve the default config directory (`~/.suspend-doctor/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".suspend-doctor"))
}
