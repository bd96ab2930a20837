//! Three-stage suspend diagnosis state machine.
//!
//! `StatsCheck -> WakelockCheck -> DmesgCheck -> Done`. Each stage either
//! concludes the diagnosis and jumps to `Done`, or records why it is not
//! conclusive and advances. Stages never run backwards and a later stage
//! never overrides an earlier conclusion.

use serde::Serialize;
use tracing::{debug, trace};

use super::dmesg::{analyze_dmesg, DmesgFinding};
use super::stats::{parse_stats, SuspendStats};
use super::wakelocks::{parse_active_wakelocks, WakelockRecord};
use super::Evidence;

/// Number of dmesg failure lines quoted in the reasons.
pub const MAX_REPORTED_FAILURES: usize = 3;

/// Position of the machine in the stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Step 1: suspend_stats counters.
    StatsCheck,
    /// Step 2: active wakelocks.
    WakelockCheck,
    /// Step 3: kernel log.
    DmesgCheck,
    /// Terminal.
    Done,
}

/// Outcome of step 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatsStep {
    /// Counters were parsed.
    Parsed {
        /// Parsed counters.
        stats: SuspendStats,
        /// Human summary of the counters.
        message: String,
    },
    /// No suspend_stats text was supplied.
    Unavailable,
}

/// Outcome of step 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WakelockStep {
    /// The table was parsed; `active` may be empty.
    Parsed {
        /// Active wakelocks in table order.
        active: Vec<WakelockRecord>,
    },
    /// No wakelock dump was supplied.
    Unavailable,
}

impl WakelockStep {
    /// Active wakelocks, empty when unavailable.
    pub fn active(&self) -> &[WakelockRecord] {
        match self {
            Self::Parsed { active } => active.as_slice(),
            Self::Unavailable => &[],
        }
    }
}

/// Outcome of step 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DmesgStep {
    /// The kernel log was scanned.
    Analyzed(DmesgFinding),
    /// No dmesg text was supplied.
    Unavailable,
}

/// Per-stage results. A stage that never ran stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepResults {
    /// Step 1 outcome.
    pub stats: Option<StatsStep>,
    /// Step 2 outcome.
    pub wakelocks: Option<WakelockStep>,
    /// Step 3 outcome.
    pub dmesg: Option<DmesgStep>,
}

/// Verdict produced by [`diagnose`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosisResult {
    /// Whether suspend is considered to be failing.
    pub failed: bool,
    /// Audit trail, one entry per decision, in decision order.
    pub reasons: Vec<String>,
    /// What each stage that ran found.
    pub step_results: StepResults,
    /// Root-cause summary set by the terminal stage, if any.
    pub conclusion: Option<String>,
}

/// Explicit stage machine over one set of evidence.
#[derive(Debug)]
pub struct DiagnosisMachine<'a> {
    evidence: &'a Evidence,
    stage: Stage,
    result: DiagnosisResult,
}

impl<'a> DiagnosisMachine<'a> {
    /// Start a machine at [`Stage::StatsCheck`].
    pub fn new(evidence: &'a Evidence) -> Self {
        Self {
            evidence,
            stage: Stage::StatsCheck,
            result: DiagnosisResult::default(),
        }
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Result accumulated so far.
    pub fn result(&self) -> &DiagnosisResult {
        &self.result
    }

    /// Run the current stage and move to the next one. No-op once `Done`.
    pub fn step(&mut self) -> Stage {
        let from = self.stage;
        let next = match from {
            Stage::StatsCheck => check_stats(&self.evidence.stats, &mut self.result),
            Stage::WakelockCheck => check_wakelocks(&self.evidence.wakelocks, &mut self.result),
            Stage::DmesgCheck => check_dmesg(&self.evidence.dmesg, &mut self.result),
            Stage::Done => Stage::Done,
        };
        trace!(?from, to = ?next, "diagnosis stage transition");
        self.stage = next;
        next
    }

    /// Drive the machine to `Done` and return the verdict.
    pub fn run(mut self) -> DiagnosisResult {
        while self.stage != Stage::Done {
            self.step();
        }
        debug!(
            failed = self.result.failed,
            conclusion = self.result.conclusion.as_deref().unwrap_or("-"),
            "diagnosis complete"
        );
        self.result
    }
}

/// Diagnose suspend behaviour from the three evidence blobs.
///
/// Pure and deterministic: identical evidence always yields an identical
/// result, and no input can make it fail.
pub fn diagnose(evidence: &Evidence) -> DiagnosisResult {
    DiagnosisMachine::new(evidence).run()
}

fn check_stats(text: &str, result: &mut DiagnosisResult) -> Stage {
    if text.trim().is_empty() {
        // Missing counters are treated as failing. Steps 2 and 3 do not do this.
        debug!("suspend_stats unavailable, assuming suspend is failing");
        result.step_results.stats = Some(StatsStep::Unavailable);
        result.failed = true;
        result
            .reasons
            .push("Step 1: suspend_stats file not available, skipping step 1 analysis".to_owned());
        return Stage::WakelockCheck;
    }

    let stats = parse_stats(text);
    let message = stats.summary();
    result.step_results.stats = Some(StatsStep::Parsed {
        stats,
        message: message.clone(),
    });

    if stats.is_healthy() {
        result.failed = false;
        result.reasons.push("Suspend is working normally".to_owned());
        result.conclusion =
            Some("Suspend is working normally. No further analysis needed.".to_owned());
        return Stage::Done;
    }

    result.failed = true;
    result.reasons.push(format!("Step 1: {message}"));
    Stage::WakelockCheck
}

fn check_wakelocks(text: &str, result: &mut DiagnosisResult) -> Stage {
    if text.trim().is_empty() {
        result.step_results.wakelocks = Some(WakelockStep::Unavailable);
        result.reasons.push(
            "Step 2: dumpsys_suspend.txt not available, skipping wakelock analysis".to_owned(),
        );
        return Stage::DmesgCheck;
    }

    let active = parse_active_wakelocks(text);
    if active.is_empty() {
        result.step_results.wakelocks = Some(WakelockStep::Parsed { active });
        result
            .reasons
            .push("Step 2: No active wakelocks found".to_owned());
        return Stage::DmesgCheck;
    }

    let names = active
        .iter()
        .map(|record| record.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    result.step_results.wakelocks = Some(WakelockStep::Parsed { active });
    result
        .reasons
        .push(format!("Step 2: Active wakelocks found: {names}"));
    result.conclusion = Some(format!(
        "Root cause: Active wakelocks preventing suspend: {names}"
    ));
    Stage::Done
}

fn check_dmesg(text: &str, result: &mut DiagnosisResult) -> Stage {
    if text.trim().is_empty() {
        result.step_results.dmesg = Some(DmesgStep::Unavailable);
        result
            .reasons
            .push("Step 3: dmesg.txt not available, skipping dmesg analysis".to_owned());
        return Stage::Done;
    }

    let finding = analyze_dmesg(text);

    if !finding.has_suspend_entry {
        result.reasons.push(
            "Step 3: No suspend entry found in dmesg - system did not attempt to suspend"
                .to_owned(),
        );
        result.conclusion = Some("Root cause: System did not attempt to enter suspend".to_owned());
    } else if finding.has_suspend_failure {
        result.reasons.push(format!(
            "Step 3: Suspend entry failed - {} failure(s) found",
            finding.failure_messages.len()
        ));
        for message in finding.failure_messages.iter().take(MAX_REPORTED_FAILURES) {
            result.reasons.push(format!("  - {message}"));
        }
        result.conclusion = Some("Root cause: Suspend entry failed in kernel".to_owned());
    } else {
        result
            .reasons
            .push("Step 3: Suspend entry found but no clear failure in dmesg".to_owned());
        result.conclusion = Some("Suspend failed but root cause unclear from logs".to_owned());
    }

    result.step_results.dmesg = Some(DmesgStep::Analyzed(finding));
    Stage::Done
}
