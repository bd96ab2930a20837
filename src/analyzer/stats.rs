//! Parser for `/d/suspend_stats` counters.

use std::num::IntErrorKind;

use serde::Serialize;

use super::split_lines;

/// Success and failure counters read from `suspend_stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuspendStats {
    /// Number of completed suspend cycles.
    pub success_count: i64,
    /// Number of failed suspend attempts.
    pub fail_count: i64,
}

impl SuspendStats {
    /// Suspend is healthy when at least one cycle succeeded and none failed.
    pub fn is_healthy(&self) -> bool {
        self.success_count > 0 && self.fail_count == 0
    }

    /// One-line human summary used as the step 1 message.
    pub fn summary(&self) -> String {
        let verdict = if self.is_healthy() {
            "Suspend is working normally"
        } else {
            "Suspend has failures"
        };
        format!(
            "{verdict} (success: {}, fail: {})",
            self.success_count, self.fail_count
        )
    }
}

/// Parse `key: value` lines into [`SuspendStats`].
///
/// Only the `success` and `fail` keys are read (case-sensitive). Values that
/// are missing or not numeric count as 0. Signed values are kept as-is and
/// out-of-range integers saturate, so any numeric `fail` other than 0 marks
/// suspend as failing. Lines without a `:` are ignored and a repeated key
/// keeps its last value. Never fails.
pub fn parse_stats(text: &str) -> SuspendStats {
    let mut stats = SuspendStats::default();

    for line in split_lines(text) {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "success" => stats.success_count = parse_counter(value),
            "fail" => stats.fail_count = parse_counter(value),
            _ => {}
        }
    }

    stats
}

fn parse_counter(raw: &str) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(value) => value,
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}
