//! Suspend diagnosis decision engine.
//!
//! Parses the three evidence dumps and runs the ordered, short-circuiting
//! diagnosis. Nothing in here touches the filesystem, the network or a
//! device; callers hand in text and get a [`DiagnosisResult`] back.

use serde::Serialize;

pub mod dmesg;
pub mod engine;
pub mod stats;
pub mod wakelocks;

pub use dmesg::{analyze_dmesg, DmesgFinding};
pub use engine::{
    diagnose, DiagnosisMachine, DiagnosisResult, DmesgStep, Stage, StatsStep, StepResults,
    WakelockStep, MAX_REPORTED_FAILURES,
};
pub use stats::{parse_stats, SuspendStats};
pub use wakelocks::{parse_active_wakelocks, WakelockRecord};

/// Raw evidence text. An empty string means the artifact was not collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evidence {
    /// Contents of `/d/suspend_stats`.
    pub stats: String,
    /// Output of `dumpsys suspend_control_internal`.
    pub wakelocks: String,
    /// Output of `dmesg`.
    pub dmesg: String,
}

/// Split text into lines, treating `\n`, `\r\n` and a bare `\r` as breaks.
///
/// Some device dumps come back with CR-only line endings, which
/// [`str::lines`] would leave as one line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().flat_map(|line| line.split('\r'))
}
