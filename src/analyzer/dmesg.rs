//! Kernel log scanning for suspend entry and suspend failure markers.

use serde::Serialize;

use super::split_lines;

/// Markers written by the kernel when it starts a suspend transition.
const SUSPEND_ENTRY_MARKERS: [&str; 2] = ["PM: suspend entry", "PM: Syncing filesystems"];

/// Markers for a failed suspend attempt, checked in order.
///
/// The last entry looks like a pattern but is matched as a literal substring.
pub const SUSPEND_FAILURE_MARKERS: [&str; 4] = [
    "PM: suspend entry failed",
    "suspend entry failed",
    "PM: Some devices failed to suspend",
    "PM: Device .* failed to suspend",
];

/// What the kernel log says about suspend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DmesgFinding {
    /// The kernel began at least one suspend transition.
    pub has_suspend_entry: bool,
    /// At least one line carried a failure marker.
    pub has_suspend_failure: bool,
    /// Trimmed failure lines in log order.
    pub failure_messages: Vec<String>,
}

/// Scan a dmesg dump for suspend markers.
pub fn analyze_dmesg(text: &str) -> DmesgFinding {
    let has_suspend_entry = SUSPEND_ENTRY_MARKERS
        .iter()
        .any(|marker| text.contains(marker));

    let failure_messages: Vec<String> = split_lines(text)
        .filter(|line| failure_marker(line).is_some())
        .map(|line| line.trim().to_owned())
        .collect();

    DmesgFinding {
        has_suspend_entry,
        has_suspend_failure: !failure_messages.is_empty(),
        failure_messages,
    }
}

/// First failure marker contained in `line`, if any.
pub fn failure_marker(line: &str) -> Option<&'static str> {
    SUSPEND_FAILURE_MARKERS
        .iter()
        .copied()
        .find(|marker| line.contains(marker))
}
