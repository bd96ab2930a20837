//! Parser for the wakelock table printed by `dumpsys suspend_control_internal`.
//!
//! Data rows look like `| NAME | PID | TYPE | STATUS | ... |`. Only the name
//! (column 1) and status (column 4) are read; the column positions are fixed
//! by the producing tool.

use serde::Serialize;

use super::split_lines;

/// Minimum number of `|`-separated columns for a data row.
const MIN_COLUMNS: usize = 5;
const NAME_COLUMN: usize = 1;
const STATUS_COLUMN: usize = 4;

/// Status marker for a held wakelock.
const ACTIVE_MARKER: &str = "Active";

/// A wakelock row found in the status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WakelockRecord {
    /// Trimmed wakelock name.
    pub name: String,
    /// Whether the status column reported the lock as held.
    pub is_active: bool,
}

/// Extract active wakelocks, in table order.
pub fn parse_active_wakelocks(text: &str) -> Vec<WakelockRecord> {
    split_lines(text).filter_map(parse_active_row).collect()
}

/// Parse a single table line, returning a record only for an active data row.
fn parse_active_row(line: &str) -> Option<WakelockRecord> {
    let line = line.trim();
    if line.is_empty() || !line.contains('|') || !line.contains(ACTIVE_MARKER) {
        return None;
    }

    let columns: Vec<&str> = line.split('|').collect();
    if columns.len() < MIN_COLUMNS {
        return None;
    }

    let name = columns.get(NAME_COLUMN)?.trim();
    let status = columns.get(STATUS_COLUMN)?.trim();

    if !status.contains(ACTIVE_MARKER) || !is_wakelock_name(name) {
        return None;
    }

    Some(WakelockRecord {
        name: name.to_owned(),
        is_active: true,
    })
}

/// Reject table borders, the header row and section titles.
fn is_wakelock_name(name: &str) -> bool {
    if name.is_empty() || name.starts_with('-') {
        return false;
    }
    let lowered = name.to_lowercase();
    lowered != "name" && !lowered.contains("wakelock stats")
}
